//! Moisture diffusion from fresh water

use std::collections::VecDeque;

use crate::graph::Graph;

/// Fraction of moisture carried to a neighbor
const DECAY: f64 = 0.9;

/// Moisture a river corner holds before diffusion
#[inline]
fn river_moisture(volume: u32) -> f64 {
    (0.2 * volume as f64).min(3.0)
}

/// Spread moisture from rivers and lakes across the corners
///
/// Fresh water seeds the queue and every improvement re-enqueues the
/// improved corner. Ocean corners are set to 1.0 afterwards without
/// spreading.
pub fn assign_corner_moisture(graph: &mut Graph) {
    let mut queue = VecDeque::new();
    for corner in &mut graph.corners {
        corner.moisture = 0.0;
        if (corner.water || corner.river > 0) && !corner.ocean {
            corner.moisture = if corner.river > 0 {
                river_moisture(corner.river)
            } else {
                1.0
            };
            queue.push_back(corner.index);
        }
    }

    while let Some(q) = queue.pop_front() {
        let carried = graph.corners[q].moisture * DECAY;
        for i in 0..graph.corners[q].adjacent.len() {
            let r = graph.corners[q].adjacent[i];
            if graph.corners[r].moisture < carried {
                graph.corners[r].moisture = carried;
                queue.push_back(r);
            }
        }
    }

    for corner in graph.corners.iter_mut().filter(|c| c.ocean) {
        corner.moisture = 1.0;
    }
}

/// Each center's moisture is the mean of its corners, each capped at 1.0
pub fn assign_center_moisture(graph: &mut Graph) {
    for center in &mut graph.centers {
        center.moisture = if center.corners.is_empty() {
            0.0
        } else {
            let sum: f64 = center
                .corners
                .iter()
                .map(|&k| graph.corners[k].moisture.min(1.0))
                .sum();
            sum / center.corners.len() as f64
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::random_points;
    use crate::geometry::Rect;
    use crate::graph::build_graph;
    use crate::voronoi::Voronoi;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dry_graph(seed: u64) -> Graph {
        let bounds = Rect::square(64.0);
        let points = random_points(150, bounds, &mut ChaCha8Rng::seed_from_u64(seed));
        build_graph(&points, &Voronoi::new(&points, bounds)).unwrap()
    }

    #[test]
    fn test_river_moisture_capped() {
        assert!((river_moisture(1) - 0.2).abs() < 1e-12);
        assert_eq!(river_moisture(15), 3.0);
        assert_eq!(river_moisture(400), 3.0);
    }

    #[test]
    fn test_lake_spreads_with_decay() {
        let mut graph = dry_graph(1);
        let lake = graph
            .corners()
            .iter()
            .find(|c| !c.border && c.adjacent.len() >= 3)
            .map(|c| c.index)
            .unwrap();
        graph.corners[lake].water = true;
        assign_corner_moisture(&mut graph);

        assert_eq!(graph.corner(lake).moisture, 1.0);
        for &a in &graph.corner(lake).adjacent {
            assert!((graph.corner(a).moisture - DECAY).abs() < 1e-12);
        }
        for corner in graph.corners() {
            assert!(corner.moisture > 0.0 && corner.moisture <= 1.0);
        }
    }

    #[test]
    fn test_ocean_does_not_spread() {
        let mut graph = dry_graph(2);
        for k in 0..graph.corners.len() {
            if graph.corners[k].border {
                graph.corners[k].ocean = true;
                graph.corners[k].water = true;
            }
        }
        assign_corner_moisture(&mut graph);
        for corner in graph.corners() {
            if corner.ocean {
                assert_eq!(corner.moisture, 1.0);
            } else {
                assert_eq!(corner.moisture, 0.0);
            }
        }
    }

    #[test]
    fn test_river_beats_distance() {
        let mut graph = dry_graph(3);
        let source = graph
            .corners()
            .iter()
            .find(|c| !c.border)
            .map(|c| c.index)
            .unwrap();
        graph.corners[source].river = 10;
        assign_corner_moisture(&mut graph);

        assert!((graph.corner(source).moisture - 2.0).abs() < 1e-12);
        for &a in &graph.corner(source).adjacent {
            assert!((graph.corner(a).moisture - 1.8).abs() < 1e-12);
        }
    }

    #[test]
    fn test_center_mean_caps_corners() {
        let mut graph = dry_graph(4);
        for corner in &mut graph.corners {
            corner.moisture = 2.5;
        }
        let first = graph.centers[0].corners[0];
        graph.corners[first].moisture = 0.0;
        assign_center_moisture(&mut graph);

        let n = graph.center(0).corners.len() as f64;
        assert!((graph.center(0).moisture - (n - 1.0) / n).abs() < 1e-12);
        for center in graph.centers() {
            assert!(center.moisture <= 1.0);
        }
    }
}
