//! Site generation
//!
//! Produces the input point set for the subdivision: uniform random points,
//! optionally smoothed with Lloyd's relaxation.

mod lloyd;
mod points;

pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use points::{default_point_count, random_points, AREA_PER_POINT};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::IslandConfig;
use crate::geometry::Point;

/// Generate the relaxed site set described by a configuration
pub fn generate_sites(config: &IslandConfig) -> Vec<Point> {
    let bounds = config.bounds();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // Step 1: Uniform random points
    let points = random_points(config.point_count(), bounds, &mut rng);

    // Step 2: Lloyd's relaxation with optional early exit
    if config.lloyd_iterations > 0 {
        let options = LloydOptions {
            max_iterations: config.lloyd_iterations,
            convergence_threshold: config.lloyd_convergence,
        };
        lloyd_relaxation_with_options(points, bounds, options)
    } else {
        points
    }
}
