//! Terrain graph: Centers, Corners and Edges in index-addressed arenas
//!
//! Every relation between records is an index into one of the three arenas
//! held by [`Graph`]. All adjacency lists are duplicate-free and sorted
//! ascending, except [`Center::corners`] which is kept in clockwise polygon
//! order.
//!
//! # Example
//!
//! ```
//! use voronoi_island::*;
//!
//! let config = IslandConfigBuilder::new()
//!     .seed(3)
//!     .map_size(MapSize::Tiny)
//!     .build()
//!     .unwrap();
//! let island = Island::generate(config).unwrap();
//! let graph = island.graph();
//!
//! for center in graph.centers() {
//!     assert_eq!(center.border, center.corners.iter().any(|&c| graph.corner(c).border));
//! }
//! ```

mod build;
mod buckets;

pub use build::{build_graph, CORNER_EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{IslandError, Result};
use crate::geometry::{polygon_contains, Point, Rect};
use crate::terrain::Biome;

/// Adjacency lists are kept ascending and duplicate-free
pub(crate) fn sort_dedup(list: &mut Vec<usize>) {
    list.sort_unstable();
    list.dedup();
}

/// A terrain cell: one input site and its Voronoi polygon
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Center {
    /// Index in the centers arena, equal to the site's input index
    pub index: usize,
    /// Site position
    pub position: Point,
    pub water: bool,
    pub ocean: bool,
    pub coast: bool,
    pub border: bool,
    pub biome: Biome,
    /// Mean of the corner elevations
    pub elevation: f64,
    /// Mean of the corner moistures, each capped at 1.0
    pub moisture: f64,
    /// Centers sharing an edge with this one
    pub neighbors: Vec<usize>,
    /// Edges bounding this cell
    pub borders: Vec<usize>,
    /// Polygon corners in clockwise order
    pub corners: Vec<usize>,
}

impl Center {
    pub(crate) fn new(index: usize, position: Point) -> Self {
        Self {
            index,
            position,
            water: false,
            ocean: false,
            coast: false,
            border: false,
            biome: Biome::default(),
            elevation: 0.0,
            moisture: 0.0,
            neighbors: Vec::new(),
            borders: Vec::new(),
            corners: Vec::new(),
        }
    }

    /// Corner positions in polygon order
    pub fn polygon(&self, graph: &Graph) -> Vec<Point> {
        self.corners.iter().map(|&c| graph.corners[c].position).collect()
    }

    /// Ray-casting containment test against the cell polygon
    pub fn contains(&self, point: Point, graph: &Graph) -> bool {
        polygon_contains(&self.polygon(graph), point)
    }
}

/// A terrain vertex: one deduplicated Voronoi vertex
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    pub index: usize,
    pub position: Point,
    pub water: bool,
    pub ocean: bool,
    pub coast: bool,
    /// On the rectangle boundary
    pub border: bool,
    pub elevation: f64,
    pub moisture: f64,
    /// River volume passing through; 0 means no river
    pub river: u32,
    /// Lowest strictly-lower adjacent corner, or this corner itself
    pub downslope: usize,
    /// Drain corner reached by following `downslope`
    pub watershed: usize,
    /// Number of corners draining into this one
    pub watershed_size: u32,
    pub touches: Vec<usize>,
    pub protrudes: Vec<usize>,
    pub adjacent: Vec<usize>,
}

impl Corner {
    pub(crate) fn new(index: usize, position: Point, border: bool) -> Self {
        Self {
            index,
            position,
            water: false,
            ocean: false,
            coast: false,
            border,
            elevation: 0.0,
            moisture: 0.0,
            river: 0,
            downslope: index,
            watershed: index,
            watershed_size: 0,
            touches: Vec::new(),
            protrudes: Vec::new(),
            adjacent: Vec::new(),
        }
    }

    /// Dry land that is not on the shoreline
    #[inline]
    pub fn is_inland(&self) -> bool {
        !self.ocean && !self.water && !self.coast
    }

    /// Whether following `downslope` goes nowhere
    #[inline]
    pub fn is_local_minimum(&self) -> bool {
        self.downslope == self.index
    }
}

/// A Voronoi edge with its Delaunay dual
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub index: usize,
    /// Delaunay endpoints (the two cells this edge separates)
    pub d0: usize,
    pub d1: usize,
    /// Voronoi endpoints
    pub v0: Option<usize>,
    pub v1: Option<usize>,
    pub midpoint: Option<Point>,
    /// River volume along this edge
    pub river: u32,
}

impl Edge {
    /// The corner at the other end from `corner`
    pub fn other_corner(&self, corner: usize) -> Option<usize> {
        match (self.v0, self.v1) {
            (Some(a), Some(b)) if a == corner => Some(b),
            (Some(a), Some(b)) if b == corner => Some(a),
            _ => None,
        }
    }
}

/// The assembled terrain graph
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub(crate) bounds: Rect,
    pub(crate) centers: Vec<Center>,
    pub(crate) corners: Vec<Corner>,
    pub(crate) edges: Vec<Edge>,
}

impl Graph {
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// # Panics
    ///
    /// Panics if `id` is out of range
    #[inline]
    pub fn center(&self, id: usize) -> &Center {
        &self.centers[id]
    }

    /// # Panics
    ///
    /// Panics if `id` is out of range
    #[inline]
    pub fn corner(&self, id: usize) -> &Corner {
        &self.corners[id]
    }

    /// # Panics
    ///
    /// Panics if `id` is out of range
    #[inline]
    pub fn edge(&self, id: usize) -> &Edge {
        &self.edges[id]
    }

    /// Edge joining two adjacent corners
    pub fn edge_between_corners(&self, a: usize, b: usize) -> Option<usize> {
        self.corners[a]
            .protrudes
            .iter()
            .copied()
            .find(|&e| self.edges[e].other_corner(a) == Some(b))
    }

    /// Edge separating two neighboring centers
    pub fn edge_between_centers(&self, a: usize, b: usize) -> Option<usize> {
        self.centers[a].borders.iter().copied().find(|&e| {
            let edge = &self.edges[e];
            (edge.d0 == a && edge.d1 == b) || (edge.d0 == b && edge.d1 == a)
        })
    }

    /// Nearest center by site distance, linear scan
    pub fn nearest_center(&self, point: Point) -> Option<usize> {
        self.centers
            .iter()
            .map(|c| (c.index, c.position.distance_squared(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(index, _)| index)
    }

    /// Check every structural guarantee of the graph
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` describing the first broken relation
    pub fn validate(&self) -> Result<()> {
        let (nc, nk, ne) = (self.centers.len(), self.corners.len(), self.edges.len());
        let fail = |msg: String| Err(IslandError::InvariantViolation(msg));

        for center in &self.centers {
            let id = center.index;
            if center.coast && center.water {
                return fail(format!("center {} is both coast and water", id));
            }
            for &n in &center.neighbors {
                if n >= nc || !self.centers[n].neighbors.contains(&id) {
                    return fail(format!("center {} neighbor {} is not mutual", id, n));
                }
            }
            for &k in &center.corners {
                if k >= nk || !self.corners[k].touches.contains(&id) {
                    return fail(format!("center {} corner {} does not touch back", id, k));
                }
            }
            for &e in &center.borders {
                if e >= ne || (self.edges[e].d0 != id && self.edges[e].d1 != id) {
                    return fail(format!("center {} border {} does not reference it", id, e));
                }
            }
        }

        for corner in &self.corners {
            let id = corner.index;
            if corner.coast && corner.water {
                return fail(format!("corner {} is both coast and water", id));
            }
            if corner.downslope >= nk || corner.watershed >= nk {
                return fail(format!("corner {} has a dangling downslope or watershed", id));
            }
            for &t in &corner.touches {
                if t >= nc || !self.centers[t].corners.contains(&id) {
                    return fail(format!("corner {} touches {} one way", id, t));
                }
            }
            for &a in &corner.adjacent {
                if a >= nk || !self.corners[a].adjacent.contains(&id) {
                    return fail(format!("corner {} adjacency to {} is not mutual", id, a));
                }
            }
            for &e in &corner.protrudes {
                if e >= ne || (self.edges[e].v0 != Some(id) && self.edges[e].v1 != Some(id)) {
                    return fail(format!("corner {} protrudes {} one way", id, e));
                }
            }
        }

        for edge in &self.edges {
            if edge.d0 >= nc || edge.d1 >= nc {
                return fail(format!("edge {} has a dangling center", edge.index));
            }
            if edge.v0.is_some() != edge.v1.is_some() {
                return fail(format!("edge {} has exactly one corner", edge.index));
            }
            for c in [edge.d0, edge.d1] {
                if !self.centers[c].borders.contains(&edge.index) {
                    return fail(format!("edge {} missing from center {}", edge.index, c));
                }
            }
            for k in [edge.v0, edge.v1].into_iter().flatten() {
                if k >= nk || !self.corners[k].protrudes.contains(&edge.index) {
                    return fail(format!("edge {} missing from corner {}", edge.index, k));
                }
            }
        }

        Ok(())
    }

    /// Check the guarantees the terrain pipeline establishes on top of
    /// [`Graph::validate`]
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` describing the first broken guarantee
    pub fn validate_terrain(&self) -> Result<()> {
        self.validate()?;
        let fail = |msg: String| Err(IslandError::InvariantViolation(msg));

        for corner in &self.corners {
            if corner.border && !(corner.ocean && corner.water) {
                return fail(format!("border corner {} is not ocean", corner.index));
            }
            if !corner.elevation.is_finite() {
                return fail(format!("corner {} has no finite elevation", corner.index));
            }
            let down = &self.corners[corner.downslope];
            if down.elevation > corner.elevation
                || (!corner.is_local_minimum() && down.elevation == corner.elevation)
            {
                return fail(format!("corner {} drains uphill", corner.index));
            }
        }
        for center in &self.centers {
            if center.border && !(center.ocean && center.water) {
                return fail(format!("border center {} is not ocean", center.index));
            }
            if center.biome.is_water() != center.water {
                return fail(format!("center {} biome disagrees with its water flag", center.index));
            }
        }
        Ok(())
    }
}
