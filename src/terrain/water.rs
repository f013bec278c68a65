//! Land/water calibration and ocean/coast propagation

use std::collections::VecDeque;

use super::shape::{IslandShape, DEFAULT_SEA_LEVEL};
use crate::error::{IslandError, Result};
use crate::graph::Graph;

/// Maximum sea-level adjustments before settling for the last result
pub const MAX_CALIBRATION_ATTEMPTS: usize = 10;

/// Acceptable distance between requested and achieved land ratio
pub const LAND_RATIO_TOLERANCE: f64 = 0.01;

/// Outcome of the land ratio search
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Shape evaluations performed
    pub attempts: usize,
    /// Sea level of the kept attempt
    pub sea_level: f64,
    /// Fraction of land corners in the kept attempt
    pub achieved_ratio: f64,
    pub converged: bool,
}

fn land_ratio(graph: &Graph) -> f64 {
    if graph.corners.is_empty() {
        return 0.0;
    }
    let land = graph.corners.iter().filter(|c| !c.water).count();
    land as f64 / graph.corners.len() as f64
}

/// Set every corner's `water` flag from `shape`, bisecting the sea level
/// until the land ratio is within tolerance of `target`
///
/// Border corners are always water, so the measured ratio is the one the
/// finished map has.
pub fn calibrate_land(graph: &mut Graph, shape: &dyn IslandShape, target: f64) -> Calibration {
    if target <= 0.0 || target >= 1.0 {
        let water = target <= 0.0;
        for corner in &mut graph.corners {
            corner.water = water || corner.border;
        }
        return Calibration {
            attempts: 0,
            sea_level: if water { f64::INFINITY } else { f64::NEG_INFINITY },
            achieved_ratio: land_ratio(graph),
            converged: true,
        };
    }

    let mut sea_level = DEFAULT_SEA_LEVEL;
    let mut step = DEFAULT_SEA_LEVEL / 2.0;
    let mut calibration = Calibration {
        attempts: 0,
        sea_level,
        achieved_ratio: 0.0,
        converged: false,
    };

    for attempt in 1..=MAX_CALIBRATION_ATTEMPTS {
        for corner in &mut graph.corners {
            corner.water = corner.border || !shape.is_land(corner.position, sea_level);
        }
        let achieved = land_ratio(graph);
        calibration = Calibration {
            attempts: attempt,
            sea_level,
            achieved_ratio: achieved,
            converged: (target - achieved).abs() < LAND_RATIO_TOLERANCE,
        };

        tracing::debug!(
            target: "voronoi_island::terrain",
            attempt,
            sea_level,
            achieved,
            target,
            "calibration.attempt"
        );

        if calibration.converged || attempt == MAX_CALIBRATION_ATTEMPTS {
            break;
        }
        sea_level += if achieved > target { step } else { -step };
        step /= 2.0;
    }

    if !calibration.converged {
        tracing::warn!(
            target: "voronoi_island::terrain",
            target,
            achieved = calibration.achieved_ratio,
            attempts = calibration.attempts,
            "calibration.not_converged"
        );
    }
    calibration
}

/// Derive ocean, coast and border flags for corners and centers
///
/// Border corners become ocean. Ocean then floods through connected water
/// corners; water left unreached is lake. A center is water when it is
/// ocean or more than `lake_threshold` of its corners are water.
///
/// # Errors
///
/// Returns `InvariantViolation` if a corner ends up both coast and water
pub fn assign_ocean_coast(graph: &mut Graph, lake_threshold: f64) -> Result<()> {
    let mut queue = VecDeque::new();
    for corner in &mut graph.corners {
        corner.ocean = false;
        corner.coast = false;
        if corner.border {
            corner.ocean = true;
            corner.water = true;
            queue.push_back(corner.index);
        }
    }

    while let Some(q) = queue.pop_front() {
        for i in 0..graph.corners[q].adjacent.len() {
            let r = graph.corners[q].adjacent[i];
            let corner = &mut graph.corners[r];
            if corner.water && !corner.ocean {
                corner.ocean = true;
                queue.push_back(r);
            }
        }
    }

    for k in 0..graph.corners.len() {
        let corner = &graph.corners[k];
        let coast = !corner.water
            && corner
                .adjacent
                .iter()
                .any(|&a| graph.corners[a].water);
        graph.corners[k].coast = coast;
    }

    for center in &mut graph.centers {
        let corners = &graph.corners;
        let total = center.corners.len();
        let water = center.corners.iter().filter(|&&k| corners[k].water).count();

        center.ocean = center.corners.iter().any(|&k| corners[k].ocean);
        center.border = center.corners.iter().any(|&k| corners[k].border);
        center.water =
            center.ocean || (total > 0 && water as f64 / total as f64 > lake_threshold);
        center.coast = !center.water && center.corners.iter().any(|&k| corners[k].coast);
    }

    if let Some(bad) = graph.corners.iter().find(|c| c.coast && c.water) {
        return Err(IslandError::invariant(format!(
            "corner {} is both coast and water",
            bad.index
        )));
    }
    Ok(())
}
