//! Example: Generate an island
//!
//! Runs the full pipeline and prints the biome histogram and pipeline report.
//! Set `RUST_LOG=voronoi_island=debug` to see each stage.

use std::collections::BTreeMap;

use voronoi_island::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();

    println!("Voronoi Island Generation Example");
    println!("=================================\n");

    let config = IslandConfigBuilder::new()
        .seed(42)
        .map_size(MapSize::Small)
        .land_ratio(0.5)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Map Size: {}", config.map_size.name());
    println!("  Point Count: {}", config.point_count());
    println!("  Lloyd Iterations: {}", config.lloyd_iterations);
    println!("  Shape: {:?}", config.shape);
    println!();

    let island = Island::generate(config).expect("Failed to generate island");
    let graph = island.graph();
    println!(
        "Generated {} centers, {} corners, {} edges\n",
        graph.centers().len(),
        graph.corners().len(),
        graph.edges().len()
    );

    let report = island.report();
    println!("Pipeline:");
    println!(
        "  Land ratio: {:.3} after {} attempts (converged: {})",
        report.calibration.achieved_ratio, report.calibration.attempts, report.calibration.converged
    );
    println!("  Watershed passes: {}", report.watershed_passes);
    println!("  Rivers: {} of {}", report.rivers_traced, report.rivers_requested);
    println!(
        "  Centers: {} land, {} ocean, {} lake",
        report.land_centers, report.ocean_centers, report.lake_centers
    );
    println!();

    let mut histogram: BTreeMap<&str, usize> = BTreeMap::new();
    for center in graph.centers() {
        *histogram.entry(center.biome.name()).or_default() += 1;
    }
    println!("Biomes:");
    for (name, count) in &histogram {
        println!("  {:<28} {}", name, count);
    }

    let probe = graph.bounds().center();
    let id = island.center_containing(probe);
    let center = graph.center(id);
    println!(
        "\nMap center lies in cell {} ({}, elevation {:.2}, moisture {:.2})",
        id,
        center.biome.name(),
        center.elevation,
        center.moisture
    );
}
