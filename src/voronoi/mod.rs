//! Planar subdivision: Fortune's sweepline Voronoi diagram clipped to a rectangle
//!
//! [`Voronoi::new`] sorts the input sites, runs the sweep, then clips every
//! bisector against the working rectangle. Each [`Edge`] knows its two
//! generating sites (its Delaunay dual) and, where bounded, its two Voronoi
//! vertices.

mod edge;
mod edge_list;
mod fortune;
mod halfedge;
mod queue;
mod region;
mod site;
mod vertex;

pub use edge::{Edge, Side};
pub use site::Site;

pub(crate) use region::region_average;

use crate::geometry::{LineSegment, Point, Rect};
use site::SiteList;
use vertex::Vertex;

/// A Voronoi diagram of a point set within a bounding rectangle
pub struct Voronoi {
    bounds: Rect,
    sites: Vec<Site>,
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
    /// Sweep id of each input point, `None` for dropped duplicates
    site_of_input: Vec<Option<usize>>,
}

impl Voronoi {
    /// Run the sweep over `points` and clip the result to `bounds`
    ///
    /// Exact duplicate points are silently dropped; only the first occurrence
    /// gets a cell.
    pub fn new(points: &[Point], bounds: Rect) -> Self {
        let output = fortune::sweep(SiteList::new(points));

        let mut edges = output.edges;
        let vertices = output.vertices;
        for edge in &mut edges {
            edge.clip(|id| region::vertex_coord(&vertices, id), &bounds);
        }

        let mut site_of_input = vec![None; points.len()];
        for (id, site) in output.sites.iter().enumerate() {
            site_of_input[site.index] = Some(id);
        }

        tracing::debug!(
            target: "voronoi_island::voronoi",
            sites = output.sites.len(),
            edges = edges.len(),
            visible = edges.iter().filter(|e| e.is_visible()).count(),
            vertices = output.confirmed_vertices,
            "voronoi.sweep.complete"
        );

        Self {
            bounds,
            sites: output.sites,
            edges,
            vertices,
            site_of_input,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Sites in sweep order (ascending y, then x), duplicates removed
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// All bisector edges, including invisible ones
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Coordinate of a confirmed Voronoi vertex referenced by an edge
    pub fn vertex(&self, id: usize) -> Point {
        self.vertices[id].coord
    }

    /// Segment joining the two sites an edge separates
    pub fn delaunay_line(&self, edge: &Edge) -> LineSegment {
        LineSegment::new(
            self.sites[edge.site(Side::Left)].coord,
            self.sites[edge.site(Side::Right)].coord,
        )
    }

    /// The visible, clipped part of an edge
    pub fn voronoi_edge(&self, edge: &Edge) -> Option<LineSegment> {
        edge.clipped_segment()
    }

    /// Clipped cell polygon for the input point at `input_index`
    ///
    /// Empty for dropped duplicates. A lone site owns the whole rectangle.
    pub fn region(&self, input_index: usize) -> Vec<Point> {
        let Some(Some(id)) = self.site_of_input.get(input_index).copied() else {
            return Vec::new();
        };
        if self.sites.len() == 1 {
            return self.bounds.corners().to_vec();
        }
        region::site_region(&self.sites[id].edges, &self.edges, &self.bounds)
    }

    /// Cell polygons for every input point, in input order
    pub fn regions(&self) -> Vec<Vec<Point>> {
        (0..self.site_of_input.len()).map(|i| self.region(i)).collect()
    }
}
