//! Graph assembly from the clipped Voronoi diagram

use crate::error::{IslandError, Result};
use crate::geometry::{Point, Rect};
use crate::voronoi::Voronoi;

use super::buckets::BucketGrid;
use super::{sort_dedup, Center, Corner, Edge, Graph};

/// Two Voronoi vertices closer than this are the same corner
pub const CORNER_EPSILON: f64 = 1e-3;

/// Tolerance when matching a Delaunay endpoint back to its center
const CENTER_EPSILON: f64 = 0.01;

struct Builder {
    bounds: Rect,
    centers: Vec<Center>,
    corners: Vec<Corner>,
    edges: Vec<Edge>,
    center_grid: BucketGrid,
    corner_grid: BucketGrid,
}

impl Builder {
    fn center_at(&self, p: Point) -> Result<usize> {
        self.center_grid
            .find(p, CENTER_EPSILON, |id| self.centers[id].position)
            .ok_or_else(|| IslandError::invariant(format!("no center at site position {:?}", p)))
    }

    /// Existing corner within epsilon of `p`, or a new one
    fn make_corner(&mut self, p: Point) -> usize {
        if let Some(id) = self
            .corner_grid
            .find(p, CORNER_EPSILON, |id| self.corners[id].position)
        {
            return id;
        }
        let id = self.corners.len();
        self.corners
            .push(Corner::new(id, p, self.bounds.is_on_boundary(p)));
        self.corner_grid.insert(p, id);
        id
    }

    fn link(&mut self, center: usize, corner: usize) {
        self.centers[center].corners.push(corner);
        self.corners[corner].touches.push(center);
    }

    fn add_edge(&mut self, d0: usize, d1: usize, p0: Point, p1: Point) {
        let v0 = self.make_corner(p0);
        let v1 = self.make_corner(p1);
        let index = self.edges.len();
        self.edges.push(Edge {
            index,
            d0,
            d1,
            v0: Some(v0),
            v1: Some(v1),
            midpoint: Some((p0 + p1) * 0.5),
            river: 0,
        });

        self.centers[d0].borders.push(index);
        self.centers[d1].borders.push(index);
        self.centers[d0].neighbors.push(d1);
        self.centers[d1].neighbors.push(d0);

        self.corners[v0].protrudes.push(index);
        self.corners[v1].protrudes.push(index);
        // A sub-epsilon edge collapses onto one corner
        if v0 != v1 {
            self.corners[v0].adjacent.push(v1);
            self.corners[v1].adjacent.push(v0);
        }

        for center in [d0, d1] {
            for corner in [v0, v1] {
                self.link(center, corner);
            }
        }
    }

    /// Give each rectangle corner to the cell that contains it
    fn add_rectangle_corners(&mut self) {
        for p in self.bounds.corners() {
            let Some(owner) = nearest(&self.centers, p) else {
                continue;
            };
            let present = self.centers[owner]
                .corners
                .iter()
                .any(|&k| self.corners[k].position.distance(p) < CORNER_EPSILON);
            if present {
                continue;
            }
            let corner = self.make_corner(p);
            self.corners[corner].ocean = true;
            self.corners[corner].water = true;
            self.link(owner, corner);
        }
    }

    fn finish(mut self) -> Graph {
        for center in &mut self.centers {
            sort_dedup(&mut center.neighbors);
            sort_dedup(&mut center.borders);
            sort_dedup(&mut center.corners);
        }
        for corner in &mut self.corners {
            sort_dedup(&mut corner.touches);
            sort_dedup(&mut corner.protrudes);
            sort_dedup(&mut corner.adjacent);
        }
        for i in 0..self.centers.len() {
            let mut polygon = std::mem::take(&mut self.centers[i].corners);
            sort_clockwise(&mut polygon, &self.corners);
            self.centers[i].corners = polygon;
        }

        Graph {
            bounds: self.bounds,
            centers: self.centers,
            corners: self.corners,
            edges: self.edges,
        }
    }
}

fn nearest(centers: &[Center], p: Point) -> Option<usize> {
    centers
        .iter()
        .map(|c| (c.index, c.position.distance_squared(p)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(index, _)| index)
}

/// Order corners clockwise (y-up) around their mean position
fn sort_clockwise(polygon: &mut [usize], corners: &[Corner]) {
    if polygon.is_empty() {
        return;
    }
    let sum: Point = polygon.iter().map(|&k| corners[k].position).sum();
    let pivot = sum / polygon.len() as f64;
    polygon.sort_by(|&a, &b| {
        let da = corners[a].position - pivot;
        let db = corners[b].position - pivot;
        db.y.atan2(db.x)
            .total_cmp(&da.y.atan2(da.x))
            .then(a.cmp(&b))
    });
}

/// Build the terrain graph for `points` from their Voronoi diagram
///
/// Centers are created one per input point, in input order. Invisible
/// bisectors contribute nothing.
///
/// # Errors
///
/// Returns `InvariantViolation` if an edge references a site with no center
/// or the finished graph fails [`Graph::validate`].
pub fn build_graph(points: &[Point], voronoi: &Voronoi) -> Result<Graph> {
    let bounds = voronoi.bounds();
    let mut builder = Builder {
        bounds,
        centers: Vec::with_capacity(points.len()),
        corners: Vec::new(),
        edges: Vec::new(),
        center_grid: BucketGrid::new(),
        corner_grid: BucketGrid::new(),
    };

    for (index, &p) in points.iter().enumerate() {
        builder.centers.push(Center::new(index, p));
        builder.center_grid.insert(p, index);
    }

    for edge in voronoi.edges() {
        let Some(segment) = voronoi.voronoi_edge(edge) else {
            continue;
        };
        let dual = voronoi.delaunay_line(edge);
        let d0 = builder.center_at(dual.p0)?;
        let d1 = builder.center_at(dual.p1)?;
        builder.add_edge(d0, d1, segment.p0, segment.p1);
    }

    builder.add_rectangle_corners();
    let mut graph = builder.finish();

    for center in &mut graph.centers {
        center.border = center.corners.iter().any(|&k| graph.corners[k].border);
    }

    graph.validate()?;

    tracing::debug!(
        target: "voronoi_island::graph",
        centers = graph.centers.len(),
        corners = graph.corners.len(),
        edges = graph.edges.len(),
        "graph.assembled"
    );
    Ok(graph)
}
