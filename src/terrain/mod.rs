//! Terrain attribute pipeline
//!
//! Runs the graph-wide passes in their fixed order: land calibration,
//! ocean/coast flags, elevation, redistribution, downslope, watersheds,
//! rivers, moisture and biomes. Each pass relies on everything before it.

mod biome;
mod elevation;
mod hydrology;
mod moisture;
mod perlin;
mod shape;
mod water;

pub use biome::{assign_biomes, classify, Biome};
pub use elevation::{
    assign_center_elevations, assign_corner_elevations, assign_downslopes, redistribute_elevations,
};
pub use hydrology::{compute_watersheds, trace_rivers, RIVER_SOURCE_ELEVATION};
pub use moisture::{assign_center_moisture, assign_corner_moisture};
pub use perlin::{sample_perlin_2d, PerlinConfig};
pub use shape::{make_shape, IslandShape, PerlinShape, RadialShape, SquareShape, DEFAULT_SEA_LEVEL};
pub use water::{
    assign_ocean_coast, calibrate_land, Calibration, LAND_RATIO_TOLERANCE, MAX_CALIBRATION_ATTEMPTS,
};

pub(crate) use hydrology::tally_watershed_sizes;

use rand::Rng;

use crate::config::IslandConfig;
use crate::error::Result;
use crate::graph::Graph;

/// Summary of one pipeline run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineReport {
    pub calibration: Calibration,
    /// Passes the watershed fixpoint took
    pub watershed_passes: usize,
    pub rivers_requested: usize,
    /// Rivers that moved at least one step
    pub rivers_traced: usize,
    pub land_centers: usize,
    pub ocean_centers: usize,
    pub lake_centers: usize,
}

/// Run every terrain pass over an assembled graph
///
/// # Errors
///
/// Returns `InvariantViolation` if any pass finds the graph in a state its
/// predecessors should have ruled out
pub fn run_pipeline<R: Rng + ?Sized>(
    graph: &mut Graph,
    config: &IslandConfig,
    rng: &mut R,
) -> Result<PipelineReport> {
    let shape = make_shape(config.shape, graph.bounds(), rng);

    let calibration = calibrate_land(graph, shape.as_ref(), config.land_ratio);
    assign_ocean_coast(graph, config.lake_threshold)?;
    tracing::info!(
        target: "voronoi_island::terrain",
        attempts = calibration.attempts,
        achieved = calibration.achieved_ratio,
        converged = calibration.converged,
        "terrain.water"
    );

    assign_corner_elevations(graph, rng)?;
    redistribute_elevations(graph);
    assign_center_elevations(graph);
    assign_downslopes(graph);
    tracing::info!(target: "voronoi_island::terrain", "terrain.elevation");

    let watershed_passes = compute_watersheds(graph)?;
    let rivers_traced = trace_rivers(graph, config.river_count, rng)?;
    tracing::info!(
        target: "voronoi_island::terrain",
        watershed_passes,
        rivers_requested = config.river_count,
        rivers_traced,
        "terrain.hydrology"
    );

    assign_corner_moisture(graph);
    assign_center_moisture(graph);
    assign_biomes(graph);
    mirror_duplicate_sites(graph);

    graph.validate_terrain()?;

    let ocean_centers = graph.centers.iter().filter(|c| c.ocean).count();
    let water_centers = graph.centers.iter().filter(|c| c.biome.is_water()).count();
    let lake_centers = water_centers - ocean_centers;
    let report = PipelineReport {
        calibration,
        watershed_passes,
        rivers_requested: config.river_count,
        rivers_traced,
        land_centers: graph.centers.len() - ocean_centers - lake_centers,
        ocean_centers,
        lake_centers,
    };
    tracing::info!(
        target: "voronoi_island::terrain",
        land = report.land_centers,
        ocean = report.ocean_centers,
        lakes = report.lake_centers,
        "terrain.complete"
    );
    Ok(report)
}

/// Give each corner-less center (a repeated site) the terrain of the
/// center that owns the polygon at its position
fn mirror_duplicate_sites(graph: &mut Graph) {
    for id in 0..graph.centers.len() {
        if !graph.centers[id].corners.is_empty() {
            continue;
        }
        let position = graph.centers[id].position;
        let Some(twin) = graph
            .centers
            .iter()
            .find(|c| c.position == position && !c.corners.is_empty())
            .map(|c| c.index)
        else {
            continue;
        };

        let source = graph.centers[twin].clone();
        let center = &mut graph.centers[id];
        center.water = source.water;
        center.ocean = source.ocean;
        center.coast = source.coast;
        center.border = source.border;
        center.elevation = source.elevation;
        center.moisture = source.moisture;
        center.biome = source.biome;
        tracing::debug!(target: "voronoi_island::terrain", center = id, twin, "terrain.duplicate_site");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IslandConfigBuilder, MapSize};
    use crate::generation::generate_sites;
    use crate::geometry::Point;
    use crate::graph::build_graph;
    use crate::voronoi::Voronoi;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(config: &IslandConfig) -> (Graph, PipelineReport) {
        let points = generate_sites(config);
        let voronoi = Voronoi::new(&points, config.bounds());
        let mut graph = build_graph(&points, &voronoi).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.terrain_seed);
        let report = run_pipeline(&mut graph, config, &mut rng).unwrap();
        (graph, report)
    }

    fn small(seed: u64) -> IslandConfigBuilder {
        IslandConfigBuilder::new().seed(seed).map_size(MapSize::Small)
    }

    #[test]
    fn test_land_ratio_calibrates_across_seeds() {
        let hits = (0..10)
            .filter(|&seed| {
                let config = small(seed).land_ratio(0.5).unwrap().build().unwrap();
                let (_, report) = run(&config);
                (report.calibration.achieved_ratio - 0.5).abs() < LAND_RATIO_TOLERANCE
            })
            .count();
        assert!(hits >= 9, "only {} of 10 seeds calibrated", hits);
    }

    #[test]
    fn test_zero_land_ratio() {
        let config = small(1).land_ratio(0.0).unwrap().build().unwrap();
        let (graph, report) = run(&config);
        assert!(graph.corners().iter().all(|c| c.water && c.ocean));
        assert_eq!(report.rivers_traced, 0);
        assert_eq!(report.land_centers, 0);
        assert!(graph.centers().iter().all(|c| c.biome == Biome::Ocean));
    }

    #[test]
    fn test_repeated_site_takes_twin_terrain() {
        let config = small(5).land_ratio(0.0).unwrap().build().unwrap();
        let points = [
            Point::new(10.0, 10.0),
            Point::new(50.0, 12.0),
            Point::new(10.0, 10.0),
            Point::new(30.0, 50.0),
            Point::new(32.0, 30.0),
        ];
        let mut graph = build_graph(&points, &Voronoi::new(&points, config.bounds())).unwrap();
        let report = run_pipeline(&mut graph, &config, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();

        let (twin, repeated) = (graph.center(0), graph.center(2));
        assert!(repeated.corners.is_empty());
        assert!(repeated.water && repeated.ocean);
        assert_eq!(repeated.biome, Biome::Ocean);
        assert_eq!(repeated.elevation, twin.elevation);
        assert_eq!(report.land_centers, 0);
        assert_eq!(report.ocean_centers, points.len());
    }

    #[test]
    fn test_deterministic() {
        let config = small(42).build().unwrap();
        let (a, ra) = run(&config);
        let (b, rb) = run(&config);
        assert_eq!(a, b);
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_terrain_seed_changes_terrain_only() {
        let a = small(7).build().unwrap();
        let b = small(7).terrain_seed(8).build().unwrap();
        let (ga, _) = run(&a);
        let (gb, _) = run(&b);
        assert_eq!(ga.centers().len(), gb.centers().len());
        for (ca, cb) in ga.centers().iter().zip(gb.centers()) {
            assert_eq!(ca.position, cb.position);
        }
        assert_ne!(ga, gb);
    }

    #[test]
    fn test_biomes_idempotent() {
        let (mut graph, _) = run(&small(3).build().unwrap());
        let before: Vec<Biome> = graph.centers().iter().map(|c| c.biome).collect();
        assign_biomes(&mut graph);
        let after: Vec<Biome> = graph.centers().iter().map(|c| c.biome).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_pipeline_invariants() {
        for shape in [
            crate::config::IslandShapeKind::Perlin,
            crate::config::IslandShapeKind::Radial,
            crate::config::IslandShapeKind::Square,
        ] {
            let config = small(9).shape(shape).build().unwrap();
            let (graph, report) = run(&config);
            graph.validate_terrain().unwrap();
            assert_eq!(
                report.land_centers + report.ocean_centers + report.lake_centers,
                graph.centers().len()
            );
            assert!(report.rivers_traced <= report.rivers_requested);

            for corner in graph.corners().iter().filter(|c| c.is_local_minimum()) {
                assert!(corner
                    .adjacent
                    .iter()
                    .all(|&a| graph.corner(a).elevation >= corner.elevation));
            }
            for center in graph.centers() {
                assert_eq!(center.biome.is_water(), center.water);
                assert!(center.moisture >= 0.0 && center.moisture <= 1.0);
                if center.border {
                    assert_eq!(center.biome, Biome::Ocean);
                }
            }
        }
    }
}
