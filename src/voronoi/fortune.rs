//! Fortune's sweepline driver

use super::edge::{Edge, Side};
use super::edge_list::EdgeList;
use super::halfedge::Halfedge;
use super::queue::EventQueue;
use super::site::{compare_y_then_x, Site, SiteList};
use super::vertex::{Vertex, PARALLEL_EPSILON};
use std::cmp::Ordering;

/// Output of one sweep: sites in sweep order, bisector edges and vertex candidates
pub(crate) struct SweepOutput {
    pub sites: Vec<Site>,
    pub edges: Vec<Edge>,
    pub vertices: Vec<Vertex>,
    pub confirmed_vertices: usize,
}

/// Scratch state for a single sweep, dropped when the sweep completes
struct Sweep {
    sites: SiteList,
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
    halfedges: Vec<Halfedge>,
    edge_list: EdgeList,
    queue: EventQueue,
    bottom_most: usize,
    confirmed: usize,
}

pub(crate) fn sweep(mut sites: SiteList) -> SweepOutput {
    let Some(bottom_most) = sites.next() else {
        return SweepOutput {
            sites: sites.into_sites(),
            edges: Vec::new(),
            vertices: Vec::new(),
            confirmed_vertices: 0,
        };
    };

    let data_bounds = sites.data_bounds();
    let sqrt_nsites = ((sites.len() + 4) as f64).sqrt() as usize;
    let mut halfedges = Vec::new();
    let edge_list = EdgeList::new(data_bounds.x, data_bounds.width, sqrt_nsites, &mut halfedges);
    let queue = EventQueue::new(data_bounds.y, data_bounds.height, sqrt_nsites);

    let mut state = Sweep {
        sites,
        edges: Vec::new(),
        vertices: Vec::new(),
        halfedges,
        edge_list,
        queue,
        bottom_most,
        confirmed: 0,
    };
    state.run();

    SweepOutput {
        sites: state.sites.into_sites(),
        edges: state.edges,
        vertices: state.vertices,
        confirmed_vertices: state.confirmed,
    }
}

impl Sweep {
    fn run(&mut self) {
        let mut new_site = self.sites.next();
        loop {
            let min_event = self.queue.min(&self.halfedges, &self.vertices);
            match (new_site, min_event) {
                (Some(site), event)
                    if event.map_or(true, |e| {
                        compare_y_then_x(self.site_coord(site), e) == Ordering::Less
                    }) =>
                {
                    self.site_event(site);
                    new_site = self.sites.next();
                }
                (_, Some(_)) => self.circle_event(),
                _ => break,
            }
        }
    }

    fn site_coord(&self, site: usize) -> crate::geometry::Point {
        self.sites.sites()[site].coord
    }

    fn left_region(&self, he: usize) -> usize {
        let h = &self.halfedges[he];
        match h.edge {
            Some(e) => self.edges[e].site(h.orientation),
            None => self.bottom_most,
        }
    }

    fn right_region(&self, he: usize) -> usize {
        let h = &self.halfedges[he];
        match h.edge {
            Some(e) => self.edges[e].site(h.orientation.other()),
            None => self.bottom_most,
        }
    }

    fn new_halfedge(&mut self, edge: usize, orientation: Side) -> usize {
        self.halfedges.push(Halfedge::new(Some(edge), orientation));
        self.halfedges.len() - 1
    }

    fn bisect(&mut self, site0: usize, site1: usize) -> usize {
        let index = self.edges.len();
        let (p0, p1) = (self.site_coord(site0), self.site_coord(site1));
        self.edges.push(Edge::bisect(index, site0, p0, site1, p1));
        let sites = self.sites.sites_mut();
        sites[site0].edges.push(index);
        sites[site1].edges.push(index);
        index
    }

    /// Schedule a circle event on `he` at the candidate vertex
    fn schedule(&mut self, he: usize, vertex: usize, focus: usize) {
        let coord = self.vertices[vertex].coord;
        self.halfedges[he].vertex = Some(vertex);
        self.halfedges[he].ystar = coord.y + coord.distance(self.site_coord(focus));
        self.queue.insert(he, &mut self.halfedges, &self.vertices);
    }

    fn site_event(&mut self, site: usize) {
        let coord = self.site_coord(site);
        let sites = self.sites.sites();
        let lbnd = self
            .edge_list
            .left_neighbor(coord, &self.halfedges, &self.edges, sites);
        let rbnd = self.halfedges[lbnd].right.unwrap_or(self.edge_list.right_end);
        let bottom = self.right_region(lbnd);

        let edge = self.bisect(bottom, site);

        let bisector = self.new_halfedge(edge, Side::Left);
        self.edge_list.insert(lbnd, bisector, &mut self.halfedges);
        if let Some(vertex) = self.intersect(lbnd, bisector) {
            self.queue.remove(lbnd, &mut self.halfedges);
            self.schedule(lbnd, vertex, site);
        }

        let lbnd = bisector;
        let bisector = self.new_halfedge(edge, Side::Right);
        self.edge_list.insert(lbnd, bisector, &mut self.halfedges);
        if let Some(vertex) = self.intersect(bisector, rbnd) {
            self.schedule(bisector, vertex, site);
        }
    }

    fn circle_event(&mut self) {
        let Some(lbnd) = self.queue.extract_min(&mut self.halfedges) else {
            return;
        };
        let left_end = self.edge_list.left_end;
        let right_end = self.edge_list.right_end;
        let llbnd = self.halfedges[lbnd].left.unwrap_or(left_end);
        let rbnd = self.halfedges[lbnd].right.unwrap_or(right_end);
        let rrbnd = self.halfedges[rbnd].right.unwrap_or(right_end);
        let mut bottom = self.left_region(lbnd);
        let mut top = self.right_region(rbnd);

        let Some(vertex) = self.halfedges[lbnd].vertex else {
            return;
        };
        self.vertices[vertex].index = Some(self.confirmed);
        self.confirmed += 1;

        for he in [lbnd, rbnd] {
            let h = &self.halfedges[he];
            if let Some(e) = h.edge {
                self.edges[e].set_vertex(h.orientation, vertex);
            }
        }
        self.edge_list.remove(lbnd, &mut self.halfedges);
        self.queue.remove(rbnd, &mut self.halfedges);
        self.edge_list.remove(rbnd, &mut self.halfedges);

        let mut side = Side::Left;
        if self.site_coord(bottom).y > self.site_coord(top).y {
            std::mem::swap(&mut bottom, &mut top);
            side = Side::Right;
        }

        let edge = self.bisect(bottom, top);
        let bisector = self.new_halfedge(edge, side);
        self.edge_list.insert(llbnd, bisector, &mut self.halfedges);
        self.edges[edge].set_vertex(side.other(), vertex);

        if let Some(candidate) = self.intersect(llbnd, bisector) {
            self.queue.remove(llbnd, &mut self.halfedges);
            self.schedule(llbnd, candidate, bottom);
        }
        if let Some(candidate) = self.intersect(bisector, rrbnd) {
            self.schedule(bisector, candidate, bottom);
        }
    }

    /// Intersection of the bisectors of two halfedges, if it lies on the
    /// correct side of both breakpoints
    fn intersect(&mut self, he0: usize, he1: usize) -> Option<usize> {
        let e0 = self.halfedges[he0].edge?;
        let e1 = self.halfedges[he1].edge?;
        let (edge0, edge1) = (&self.edges[e0], &self.edges[e1]);
        if edge0.site(Side::Right) == edge1.site(Side::Right) {
            return None;
        }

        let determinant = edge0.a * edge1.b - edge0.b * edge1.a;
        if determinant.abs() < PARALLEL_EPSILON {
            return None;
        }
        let x = (edge0.c * edge1.b - edge1.c * edge0.b) / determinant;
        let y = (edge1.c * edge0.a - edge0.c * edge1.a) / determinant;

        let right0 = self.site_coord(edge0.site(Side::Right));
        let right1 = self.site_coord(edge1.site(Side::Right));
        let (he, edge) = if compare_y_then_x(right0, right1) == Ordering::Less {
            (he0, edge0)
        } else {
            (he1, edge1)
        };

        let right_of_site = x >= self.site_coord(edge.site(Side::Right)).x;
        let orientation = self.halfedges[he].orientation;
        if (right_of_site && orientation == Side::Left)
            || (!right_of_site && orientation == Side::Right)
        {
            return None;
        }

        let vertex = Vertex::create(x, y)?;
        self.vertices.push(vertex);
        Some(self.vertices.len() - 1)
    }
}
