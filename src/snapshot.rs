//! Persistable view of a finished graph
//!
//! A snapshot carries only the read-only accessor fields of each record.
//! Everything derivable (borders, touches, protrudes, corner adjacency and
//! watershed sizes) is rebuilt on load.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{IslandError, Result};
use crate::geometry::{Point, Rect};
use crate::graph::{sort_dedup, Center, Corner, Edge, Graph};
use crate::island::Island;
use crate::terrain::{tally_watershed_sizes, Biome};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CenterRecord {
    pub position: Point,
    /// Clockwise polygon
    pub corners: Vec<usize>,
    pub neighbors: Vec<usize>,
    pub water: bool,
    pub ocean: bool,
    pub coast: bool,
    pub border: bool,
    pub elevation: f64,
    pub moisture: f64,
    pub biome: Biome,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CornerRecord {
    pub position: Point,
    pub water: bool,
    pub ocean: bool,
    pub coast: bool,
    pub border: bool,
    pub elevation: f64,
    pub moisture: f64,
    pub river: u32,
    pub downslope: usize,
    pub watershed: usize,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub d0: usize,
    pub d1: usize,
    pub v0: Option<usize>,
    pub v1: Option<usize>,
    pub river: u32,
    pub midpoint: Option<Point>,
}

/// Serializable island graph
///
/// # Example
///
/// ```
/// use voronoi_island::*;
///
/// let island = generate(9, 64.0, 0.5, 8, 0.3).unwrap();
/// let snapshot = island.snapshot();
/// let restored = Graph::from_snapshot(&snapshot).unwrap();
/// assert_eq!(&restored, island.graph());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IslandSnapshot {
    pub bounds: Rect,
    pub centers: Vec<CenterRecord>,
    pub corners: Vec<CornerRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl IslandSnapshot {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            bounds: graph.bounds(),
            centers: graph
                .centers()
                .iter()
                .map(|c| CenterRecord {
                    position: c.position,
                    corners: c.corners.clone(),
                    neighbors: c.neighbors.clone(),
                    water: c.water,
                    ocean: c.ocean,
                    coast: c.coast,
                    border: c.border,
                    elevation: c.elevation,
                    moisture: c.moisture,
                    biome: c.biome,
                })
                .collect(),
            corners: graph
                .corners()
                .iter()
                .map(|k| CornerRecord {
                    position: k.position,
                    water: k.water,
                    ocean: k.ocean,
                    coast: k.coast,
                    border: k.border,
                    elevation: k.elevation,
                    moisture: k.moisture,
                    river: k.river,
                    downslope: k.downslope,
                    watershed: k.watershed,
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|e| EdgeRecord {
                    d0: e.d0,
                    d1: e.d1,
                    v0: e.v0,
                    v1: e.v1,
                    river: e.river,
                    midpoint: e.midpoint,
                })
                .collect(),
        }
    }

    /// Reject references that point outside the arenas
    fn check_references(&self) -> Result<()> {
        let (nc, nk) = (self.centers.len(), self.corners.len());
        let bad = |what: String| Err(IslandError::InvalidInput(format!("snapshot {}", what)));

        for (i, c) in self.centers.iter().enumerate() {
            if c.corners.iter().any(|&k| k >= nk) || c.neighbors.iter().any(|&n| n >= nc) {
                return bad(format!("center {} references a missing record", i));
            }
        }
        for (i, k) in self.corners.iter().enumerate() {
            if k.downslope >= nk || k.watershed >= nk {
                return bad(format!("corner {} references a missing corner", i));
            }
        }
        for (i, e) in self.edges.iter().enumerate() {
            let corners_ok = [e.v0, e.v1].into_iter().flatten().all(|k| k < nk);
            if e.d0 >= nc || e.d1 >= nc || !corners_ok {
                return bad(format!("edge {} references a missing record", i));
            }
        }
        Ok(())
    }
}

impl Island {
    /// Snapshot of the finished graph
    pub fn snapshot(&self) -> IslandSnapshot {
        IslandSnapshot::from_graph(self.graph())
    }
}

impl Graph {
    /// Rebuild a graph, including all derived adjacency, from a snapshot
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a record references a missing record and
    /// `InvariantViolation` if the rebuilt graph fails [`Graph::validate`].
    pub fn from_snapshot(snapshot: &IslandSnapshot) -> Result<Graph> {
        snapshot.check_references()?;

        let mut centers: Vec<Center> = snapshot
            .centers
            .iter()
            .enumerate()
            .map(|(index, r)| {
                let mut center = Center::new(index, r.position);
                center.corners = r.corners.clone();
                center.neighbors = r.neighbors.clone();
                center.water = r.water;
                center.ocean = r.ocean;
                center.coast = r.coast;
                center.border = r.border;
                center.elevation = r.elevation;
                center.moisture = r.moisture;
                center.biome = r.biome;
                center
            })
            .collect();

        let mut corners: Vec<Corner> = snapshot
            .corners
            .iter()
            .enumerate()
            .map(|(index, r)| {
                let mut corner = Corner::new(index, r.position, r.border);
                corner.water = r.water;
                corner.ocean = r.ocean;
                corner.coast = r.coast;
                corner.elevation = r.elevation;
                corner.moisture = r.moisture;
                corner.river = r.river;
                corner.downslope = r.downslope;
                corner.watershed = r.watershed;
                corner
            })
            .collect();

        let mut edges = Vec::with_capacity(snapshot.edges.len());
        for (index, r) in snapshot.edges.iter().enumerate() {
            centers[r.d0].borders.push(index);
            centers[r.d1].borders.push(index);
            for k in [r.v0, r.v1].into_iter().flatten() {
                corners[k].protrudes.push(index);
            }
            if let (Some(a), Some(b)) = (r.v0, r.v1) {
                if a != b {
                    corners[a].adjacent.push(b);
                    corners[b].adjacent.push(a);
                }
            }
            edges.push(Edge {
                index,
                d0: r.d0,
                d1: r.d1,
                v0: r.v0,
                v1: r.v1,
                midpoint: r.midpoint,
                river: r.river,
            });
        }

        for center in &mut centers {
            sort_dedup(&mut center.borders);
            for &k in &center.corners {
                corners[k].touches.push(center.index);
            }
        }
        for corner in &mut corners {
            sort_dedup(&mut corner.touches);
            sort_dedup(&mut corner.protrudes);
            sort_dedup(&mut corner.adjacent);
        }

        let mut graph = Graph {
            bounds: snapshot.bounds,
            centers,
            corners,
            edges,
        };
        tally_watershed_sizes(&mut graph);
        graph.validate()?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IslandConfigBuilder, MapSize};

    fn island(seed: u64) -> Island {
        let config = IslandConfigBuilder::new()
            .seed(seed)
            .map_size(MapSize::Tiny)
            .build()
            .unwrap();
        Island::generate(config).unwrap()
    }

    #[test]
    fn test_rebuild_matches_original() {
        let island = island(21);
        let restored = Graph::from_snapshot(&island.snapshot()).unwrap();
        assert_eq!(&restored, island.graph());
    }

    #[test]
    fn test_snapshot_keeps_accessor_fields() {
        let island = island(22);
        let snapshot = island.snapshot();
        let graph = island.graph();
        assert_eq!(snapshot.centers.len(), graph.centers().len());
        assert_eq!(snapshot.corners.len(), graph.corners().len());
        assert_eq!(snapshot.edges.len(), graph.edges().len());
        for (record, center) in snapshot.centers.iter().zip(graph.centers()) {
            assert_eq!(record.corners, center.corners);
            assert_eq!(record.biome, center.biome);
        }
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let mut snapshot = island(23).snapshot();
        snapshot.edges[0].d1 = snapshot.centers.len();
        assert!(matches!(
            Graph::from_snapshot(&snapshot),
            Err(IslandError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_broken_symmetry_detected() {
        let mut snapshot = island(24).snapshot();
        let victim = snapshot
            .centers
            .iter()
            .position(|c| !c.neighbors.is_empty())
            .unwrap();
        snapshot.centers[victim].neighbors.clear();
        assert!(matches!(
            Graph::from_snapshot(&snapshot),
            Err(IslandError::InvariantViolation(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_round_trip() {
        let island = island(25);
        let json = serde_json::to_string(&island.snapshot()).unwrap();
        let snapshot: IslandSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Graph::from_snapshot(&snapshot).unwrap();
        assert_eq!(&restored, island.graph());
    }
}
