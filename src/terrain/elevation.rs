//! Elevation relaxation, redistribution and downslope pointers

use std::collections::VecDeque;

use rand::Rng;

use crate::error::{IslandError, Result};
use crate::graph::Graph;

/// Increment scale between two water corners
const WATER_STEP: f64 = 0.01;

/// Exponent sharpening the redistribution curve
const SCALE_FACTOR: f64 = 1.2;

/// Breadth-first elevation from the map border
///
/// Border corners start at 0. Every other corner takes its BFS parent's
/// elevation plus a random increment in (0, 1], scaled down to (0, 0.01]
/// when both are water. Each corner therefore has a strictly lower neighbor
/// on its way back to the border.
///
/// # Errors
///
/// Returns `InvariantViolation` if a corner cannot be reached from the border
pub fn assign_corner_elevations<R: Rng + ?Sized>(graph: &mut Graph, rng: &mut R) -> Result<()> {
    let mut queue = VecDeque::new();
    for corner in &mut graph.corners {
        if corner.border {
            corner.elevation = 0.0;
            queue.push_back(corner.index);
        } else {
            corner.elevation = f64::INFINITY;
        }
    }

    while let Some(q) = queue.pop_front() {
        let (base, q_water) = (graph.corners[q].elevation, graph.corners[q].water);
        for i in 0..graph.corners[q].adjacent.len() {
            let s = graph.corners[q].adjacent[i];
            let corner = &mut graph.corners[s];
            if corner.elevation.is_finite() {
                continue;
            }
            let scale = if q_water && corner.water { WATER_STEP } else { 1.0 };
            corner.elevation = base + scale * (1.0 - rng.gen::<f64>());
            queue.push_back(s);
        }
    }

    if let Some(lost) = graph.corners.iter().find(|c| !c.elevation.is_finite()) {
        return Err(IslandError::invariant(format!(
            "corner {} is unreachable from the border",
            lost.index
        )));
    }
    Ok(())
}

/// Redistribution curve: elevation `x` occurs with frequency ∝ (1 - x)
#[inline]
fn redistribution_curve(x: f64) -> f64 {
    1.0 - (1.0 - x).powf(0.5 * SCALE_FACTOR)
}

/// Reshape elevations into island hypsometry
///
/// Non-ocean corners are ranked and mapped through a curve biased toward
/// lowland, landing in [0, 1). Ocean corners are rescaled linearly onto
/// [-1, 0].
pub fn redistribute_elevations(graph: &mut Graph) {
    let mut land: Vec<usize> = graph
        .corners
        .iter()
        .filter(|c| !c.ocean)
        .map(|c| c.index)
        .collect();
    land.sort_by(|&a, &b| {
        graph.corners[a]
            .elevation
            .total_cmp(&graph.corners[b].elevation)
            .then(a.cmp(&b))
    });
    let count = land.len() as f64;
    for (rank, &k) in land.iter().enumerate() {
        graph.corners[k].elevation = redistribution_curve(rank as f64 / count);
    }

    let (min, max) = graph
        .corners
        .iter()
        .filter(|c| c.ocean)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.elevation), hi.max(c.elevation))
        });
    let span = max - min;
    for corner in graph.corners.iter_mut().filter(|c| c.ocean) {
        corner.elevation = if span > 0.0 {
            (corner.elevation - max) / span
        } else {
            -1.0
        };
    }
}

/// Each center's elevation is the mean of its corners
pub fn assign_center_elevations(graph: &mut Graph) {
    for center in &mut graph.centers {
        center.elevation = if center.corners.is_empty() {
            0.0
        } else {
            let sum: f64 = center
                .corners
                .iter()
                .map(|&k| graph.corners[k].elevation)
                .sum();
            sum / center.corners.len() as f64
        };
    }
}

/// Point each corner at its lowest strictly lower neighbor, or itself
pub fn assign_downslopes(graph: &mut Graph) {
    for k in 0..graph.corners.len() {
        let corner = &graph.corners[k];
        let mut best = k;
        for &a in &corner.adjacent {
            if graph.corners[a].elevation < graph.corners[best].elevation {
                best = a;
            }
        }
        graph.corners[k].downslope = best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IslandShapeKind;
    use crate::generation::random_points;
    use crate::geometry::Rect;
    use crate::graph::build_graph;
    use crate::terrain::shape::make_shape;
    use crate::terrain::water::{assign_ocean_coast, calibrate_land};
    use crate::voronoi::Voronoi;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flagged_graph(seed: u64) -> Graph {
        let bounds = Rect::square(128.0);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points = random_points(400, bounds, &mut rng);
        let mut graph = build_graph(&points, &Voronoi::new(&points, bounds)).unwrap();
        let shape = make_shape(IslandShapeKind::Perlin, bounds, &mut rng);
        calibrate_land(&mut graph, shape.as_ref(), 0.5);
        assign_ocean_coast(&mut graph, 0.3).unwrap();
        graph
    }

    #[test]
    fn test_every_corner_has_lower_neighbor() {
        let mut graph = flagged_graph(1);
        assign_corner_elevations(&mut graph, &mut ChaCha8Rng::seed_from_u64(2)).unwrap();

        for corner in graph.corners() {
            assert!(corner.elevation.is_finite());
            if corner.border {
                assert_eq!(corner.elevation, 0.0);
            } else {
                assert!(corner.elevation > 0.0);
                assert!(
                    corner
                        .adjacent
                        .iter()
                        .any(|&a| graph.corner(a).elevation < corner.elevation),
                    "corner {} has no downhill neighbor",
                    corner.index
                );
            }
        }
    }

    #[test]
    fn test_redistribution_ranges() {
        let mut graph = flagged_graph(3);
        assign_corner_elevations(&mut graph, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        redistribute_elevations(&mut graph);

        for corner in graph.corners() {
            if corner.ocean {
                assert!((-1.0..=0.0).contains(&corner.elevation));
            } else {
                assert!((0.0..1.0).contains(&corner.elevation));
            }
        }
        assert!(graph.corners().iter().any(|c| c.ocean && c.elevation == -1.0));
    }

    #[test]
    fn test_redistribution_favors_lowland() {
        let mut graph = flagged_graph(5);
        assign_corner_elevations(&mut graph, &mut ChaCha8Rng::seed_from_u64(6)).unwrap();
        redistribute_elevations(&mut graph);

        let land: Vec<f64> = graph
            .corners()
            .iter()
            .filter(|c| !c.ocean)
            .map(|c| c.elevation)
            .collect();
        let low = land.iter().filter(|&&e| e < 0.5).count();
        assert!(low * 2 > land.len());
    }

    #[test]
    fn test_curve_monotonic() {
        let mut prev = redistribution_curve(0.0);
        assert_eq!(prev, 0.0);
        for i in 1..100 {
            let next = redistribution_curve(i as f64 / 100.0);
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_downslope_strictly_lower_or_self() {
        let mut graph = flagged_graph(7);
        assign_corner_elevations(&mut graph, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
        redistribute_elevations(&mut graph);
        assign_center_elevations(&mut graph);
        assign_downslopes(&mut graph);

        for corner in graph.corners() {
            let down = graph.corner(corner.downslope);
            if corner.downslope == corner.index {
                assert!(corner
                    .adjacent
                    .iter()
                    .all(|&a| graph.corner(a).elevation >= corner.elevation));
            } else {
                assert!(down.elevation < corner.elevation);
                assert!(corner.adjacent.contains(&corner.downslope));
            }
        }
        for center in graph.centers() {
            let mean = center
                .corners
                .iter()
                .map(|&k| graph.corner(k).elevation)
                .sum::<f64>()
                / center.corners.len() as f64;
            assert!((center.elevation - mean).abs() < 1e-12);
        }
    }
}
