//! Watersheds and river tracing over the downslope graph

use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::{IslandError, Result};
use crate::graph::Graph;

/// Elevation band river sources are drawn from
pub const RIVER_SOURCE_ELEVATION: RangeInclusive<f64> = 0.3..=0.9;

/// Resolve every inland corner's watershed and tally drain sizes
///
/// Inland corners are visited in ascending elevation. Each takes its
/// downslope's watershed, or the downslope itself once that leaves the
/// inland region. Passes repeat until nothing changes.
///
/// Returns the number of passes, including the final unchanged one.
///
/// # Errors
///
/// Returns `InvariantViolation` if the pointers are still moving after
/// `|corners| + 1` passes, which only a downslope cycle can cause.
pub fn compute_watersheds(graph: &mut Graph) -> Result<usize> {
    let mut inland: Vec<usize> = graph
        .corners
        .iter()
        .filter(|c| c.is_inland())
        .map(|c| c.index)
        .collect();
    inland.sort_by(|&a, &b| {
        graph.corners[a]
            .elevation
            .total_cmp(&graph.corners[b].elevation)
            .then(a.cmp(&b))
    });

    for corner in &mut graph.corners {
        corner.watershed = corner.index;
        corner.watershed_size = 0;
    }

    let cap = graph.corners.len() + 1;
    let mut passes = 0;
    loop {
        if passes == cap {
            return Err(IslandError::invariant(format!(
                "watersheds still changing after {} passes",
                cap
            )));
        }
        passes += 1;

        let mut changed = false;
        for &c in &inland {
            let d = graph.corners[c].downslope;
            let target = if d == c {
                c
            } else if !graph.corners[d].is_inland() {
                d
            } else {
                graph.corners[d].watershed
            };
            if graph.corners[c].watershed != target {
                graph.corners[c].watershed = target;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    tally_watershed_sizes(graph);
    Ok(passes)
}

/// Count, on each terminal corner, the inland corners draining into it
pub(crate) fn tally_watershed_sizes(graph: &mut Graph) {
    for k in 0..graph.corners.len() {
        if graph.corners[k].is_inland() {
            let w = graph.corners[k].watershed;
            graph.corners[w].watershed_size += 1;
        }
    }
}

/// Trace `count` rivers down the downslope graph
///
/// Sources are drawn uniformly from the non-ocean corners inside
/// [`RIVER_SOURCE_ELEVATION`]. A walk stops at the coast or at a local
/// minimum. Returns how many walks took at least one step.
///
/// # Errors
///
/// Returns `InvariantViolation` if a corner's downslope is not joined to it
/// by an edge
pub fn trace_rivers<R: Rng + ?Sized>(graph: &mut Graph, count: usize, rng: &mut R) -> Result<usize> {
    let candidates: Vec<usize> = graph
        .corners
        .iter()
        .filter(|c| !c.ocean && RIVER_SOURCE_ELEVATION.contains(&c.elevation))
        .map(|c| c.index)
        .collect();

    if candidates.is_empty() {
        tracing::warn!(
            target: "voronoi_island::terrain",
            requested = count,
            "rivers.no_sources"
        );
        return Ok(0);
    }

    let mut traced = 0;
    for _ in 0..count {
        let mut q = candidates[rng.gen_range(0..candidates.len())];
        let mut steps = 0;
        while !graph.corners[q].coast && !graph.corners[q].is_local_minimum() {
            let d = graph.corners[q].downslope;
            let edge = graph.edge_between_corners(q, d).ok_or_else(|| {
                IslandError::invariant(format!("no edge between corner {} and its downslope {}", q, d))
            })?;
            graph.edges[edge].river += 1;
            graph.corners[q].river += 1;
            q = d;
            steps += 1;
        }
        if steps > 0 {
            traced += 1;
        }
    }
    Ok(traced)
}
