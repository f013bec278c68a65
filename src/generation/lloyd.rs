//! Lloyd's Relaxation for uniform point distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of the site
//! distribution by moving each point to the average of its clipped Voronoi
//! region's vertices.

use std::time::Instant;

use crate::geometry::{Point, Rect};
use crate::voronoi::{region_average, Voronoi};

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold as a fraction of the rectangle width.
    /// Stop when the max displacement is below it; 0.0 disables early termination
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            convergence_threshold: 0.0,
        }
    }
}

/// Apply Lloyd's Relaxation with a fixed number of passes
///
/// # Arguments
///
/// * `points` - Initial point distribution
/// * `bounds` - Working rectangle the regions are clipped to
/// * `iterations` - Number of relaxation passes (typically 2)
pub fn lloyd_relaxation(points: Vec<Point>, bounds: Rect, iterations: usize) -> Vec<Point> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, bounds, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// A point whose region is empty (a dropped duplicate) stays where it is.
pub fn lloyd_relaxation_with_options(
    mut points: Vec<Point>,
    bounds: Rect,
    options: LloydOptions,
) -> Vec<Point> {
    let convergence_threshold = options.convergence_threshold * bounds.width;
    let total_start = Instant::now();

    tracing::debug!(
        target: "voronoi_island::lloyd",
        points = points.len(),
        max_iterations = options.max_iterations,
        threshold = convergence_threshold,
        "lloyd.start"
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();
        let voronoi = Voronoi::new(&points, bounds);

        let mut max_displacement: f64 = 0.0;
        for (i, point) in points.iter_mut().enumerate() {
            if let Some(target) = region_average(&voronoi.region(i)) {
                max_displacement = max_displacement.max(point.distance(target));
                *point = target;
            }
        }
        iterations_run = iteration + 1;

        tracing::debug!(
            target: "voronoi_island::lloyd",
            iteration = iteration + 1,
            max_displacement,
            elapsed = ?iter_start.elapsed(),
            "lloyd.iteration"
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            break;
        }
    }

    tracing::debug!(
        target: "voronoi_island::lloyd",
        iterations = iterations_run,
        converged,
        elapsed = ?total_start.elapsed(),
        "lloyd.finish"
    );

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::points::random_points;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn min_spacing(points: &[Point]) -> f64 {
        let mut best = f64::INFINITY;
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                best = best.min(a.distance(*b));
            }
        }
        best
    }

    #[test]
    fn test_lloyd_relaxation() {
        let bounds = Rect::square(64.0);
        let points = random_points(100, bounds, &mut ChaCha8Rng::seed_from_u64(42));
        let relaxed = lloyd_relaxation(points.clone(), bounds, 3);

        assert_eq!(relaxed.len(), 100);
        assert!(relaxed.iter().all(|&p| bounds.contains(p)));
        assert!(
            min_spacing(&relaxed) > min_spacing(&points),
            "relaxation should spread clustered points"
        );
    }

    #[test]
    fn test_lloyd_relaxation_determinism() {
        let bounds = Rect::square(64.0);
        let points = random_points(50, bounds, &mut ChaCha8Rng::seed_from_u64(12345));

        let relaxed1 = lloyd_relaxation(points.clone(), bounds, 2);
        let relaxed2 = lloyd_relaxation(points, bounds, 2);
        assert_eq!(relaxed1, relaxed2);
    }

    #[test]
    fn test_lloyd_zero_iterations_is_identity() {
        let bounds = Rect::square(64.0);
        let points = random_points(30, bounds, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(lloyd_relaxation(points.clone(), bounds, 0), points);
    }

    #[test]
    fn test_lloyd_options_default() {
        let options = LloydOptions::default();
        assert_eq!(options.max_iterations, 2);
        assert_eq!(options.convergence_threshold, 0.0);
    }

    #[test]
    fn test_lloyd_converges_early() {
        let bounds = Rect::square(64.0);
        let points = random_points(40, bounds, &mut ChaCha8Rng::seed_from_u64(8));
        let options = LloydOptions {
            max_iterations: 50,
            convergence_threshold: 0.5,
        };
        // A huge threshold stops after the first pass
        let early = lloyd_relaxation_with_options(points.clone(), bounds, options);
        assert_eq!(early, lloyd_relaxation(points, bounds, 1));
    }
}
