//! Pending circle events bucketed by `ystar`

use super::halfedge::Halfedge;
use super::vertex::Vertex;
use crate::geometry::Point;

/// Min-priority queue of halfedges keyed by (ystar, vertex x)
///
/// Each bucket is a singly linked list threaded through
/// `Halfedge::next_in_queue`, kept sorted within the bucket. A halfedge is in
/// the queue exactly while its `vertex` is set.
pub(crate) struct EventQueue {
    ymin: f64,
    delta_y: f64,
    heads: Vec<Option<usize>>,
    count: usize,
    min_bucket: usize,
}

impl EventQueue {
    pub(crate) fn new(ymin: f64, delta_y: f64, sqrt_nsites: usize) -> Self {
        let hash_size = (4 * sqrt_nsites).max(1);
        Self {
            ymin,
            delta_y: if delta_y > 0.0 { delta_y } else { 1.0 },
            heads: vec![None; hash_size],
            count: 0,
            min_bucket: 0,
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn bucket(&self, ystar: f64) -> usize {
        let hash_size = self.heads.len();
        let raw = ((ystar - self.ymin) / self.delta_y * hash_size as f64).floor();
        if raw.is_nan() {
            0
        } else {
            raw.clamp(0.0, (hash_size - 1) as f64) as usize
        }
    }

    pub(crate) fn insert(&mut self, he: usize, halfedges: &mut [Halfedge], vertices: &[Vertex]) {
        let ystar = halfedges[he].ystar;
        let x = vertex_x(he, halfedges, vertices);
        let bucket = self.bucket(ystar);

        let mut previous: Option<usize> = None;
        let mut next = self.heads[bucket];
        while let Some(n) = next {
            let later = ystar > halfedges[n].ystar
                || (ystar == halfedges[n].ystar && x > vertex_x(n, halfedges, vertices));
            if !later {
                break;
            }
            previous = Some(n);
            next = halfedges[n].next_in_queue;
        }

        halfedges[he].next_in_queue = next;
        match previous {
            Some(p) => halfedges[p].next_in_queue = Some(he),
            None => self.heads[bucket] = Some(he),
        }
        self.count += 1;
        if bucket < self.min_bucket {
            self.min_bucket = bucket;
        }
    }

    /// Remove `he` if it is queued; clears its vertex either way
    pub(crate) fn remove(&mut self, he: usize, halfedges: &mut [Halfedge]) {
        if halfedges[he].vertex.is_none() {
            return;
        }
        let bucket = self.bucket(halfedges[he].ystar);
        let after = halfedges[he].next_in_queue;

        if self.heads[bucket] == Some(he) {
            self.heads[bucket] = after;
            self.count -= 1;
        } else {
            let mut cursor = self.heads[bucket];
            while let Some(c) = cursor {
                if halfedges[c].next_in_queue == Some(he) {
                    halfedges[c].next_in_queue = after;
                    self.count -= 1;
                    break;
                }
                cursor = halfedges[c].next_in_queue;
            }
        }

        halfedges[he].vertex = None;
        halfedges[he].next_in_queue = None;
    }

    fn adjust_min_bucket(&mut self) {
        while self.min_bucket < self.heads.len() - 1 && self.heads[self.min_bucket].is_none() {
            self.min_bucket += 1;
        }
    }

    /// Coordinates `(vertex x, ystar)` of the earliest event
    pub(crate) fn min(&mut self, halfedges: &[Halfedge], vertices: &[Vertex]) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        self.adjust_min_bucket();
        let he = self.heads[self.min_bucket]?;
        Some(Point::new(vertex_x(he, halfedges, vertices), halfedges[he].ystar))
    }

    /// Pop the earliest event; the halfedge keeps its vertex
    pub(crate) fn extract_min(&mut self, halfedges: &mut [Halfedge]) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.adjust_min_bucket();
        let he = self.heads[self.min_bucket]?;
        self.heads[self.min_bucket] = halfedges[he].next_in_queue;
        self.count -= 1;
        halfedges[he].next_in_queue = None;
        Some(he)
    }
}

fn vertex_x(he: usize, halfedges: &[Halfedge], vertices: &[Vertex]) -> f64 {
    halfedges[he]
        .vertex
        .map(|v| vertices[v].coord.x)
        .unwrap_or(f64::NEG_INFINITY)
}
