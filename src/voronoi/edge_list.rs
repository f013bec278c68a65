//! The beach line: halfedges ordered left to right, hashed by x

use super::edge::{Edge, Side};
use super::halfedge::Halfedge;
use super::site::Site;
use crate::geometry::Point;

pub(crate) struct EdgeList {
    xmin: f64,
    delta_x: f64,
    hash: Vec<Option<usize>>,
    pub left_end: usize,
    pub right_end: usize,
}

impl EdgeList {
    /// Create the list with its two sentinel ends allocated in `halfedges`
    pub(crate) fn new(xmin: f64, delta_x: f64, sqrt_nsites: usize, halfedges: &mut Vec<Halfedge>) -> Self {
        let hash_size = (2 * sqrt_nsites).max(2);
        let mut hash = vec![None; hash_size];

        let left_end = halfedges.len();
        halfedges.push(Halfedge::new(None, Side::Left));
        let right_end = halfedges.len();
        halfedges.push(Halfedge::new(None, Side::Left));
        halfedges[left_end].right = Some(right_end);
        halfedges[right_end].left = Some(left_end);

        hash[0] = Some(left_end);
        hash[hash_size - 1] = Some(right_end);

        Self {
            xmin,
            delta_x: if delta_x > 0.0 { delta_x } else { 1.0 },
            hash,
            left_end,
            right_end,
        }
    }

    /// Insert `new_halfedge` immediately to the right of `lb`
    pub(crate) fn insert(&mut self, lb: usize, new_halfedge: usize, halfedges: &mut [Halfedge]) {
        let right = halfedges[lb].right;
        halfedges[new_halfedge].left = Some(lb);
        halfedges[new_halfedge].right = right;
        if let Some(r) = right {
            halfedges[r].left = Some(new_halfedge);
        }
        halfedges[lb].right = Some(new_halfedge);
    }

    /// Unlink a halfedge and mark it deleted so stale hash entries get purged
    pub(crate) fn remove(&mut self, halfedge: usize, halfedges: &mut [Halfedge]) {
        let (left, right) = (halfedges[halfedge].left, halfedges[halfedge].right);
        if let Some(l) = left {
            halfedges[l].right = right;
        }
        if let Some(r) = right {
            halfedges[r].left = left;
        }
        let removed = &mut halfedges[halfedge];
        removed.deleted = true;
        removed.left = None;
        removed.right = None;
    }

    /// The halfedge immediately left of `p` on the beach line
    pub(crate) fn left_neighbor(
        &mut self,
        p: Point,
        halfedges: &[Halfedge],
        edges: &[Edge],
        sites: &[Site],
    ) -> usize {
        let hash_size = self.hash.len();
        let raw = ((p.x - self.xmin) / self.delta_x * hash_size as f64).floor();
        let bucket = if raw.is_nan() {
            0
        } else {
            raw.clamp(0.0, (hash_size - 1) as f64) as usize
        };

        let mut found = self.get_hash(bucket as isize, halfedges);
        let mut range = 1isize;
        while found.is_none() {
            found = self
                .get_hash(bucket as isize - range, halfedges)
                .or_else(|| self.get_hash(bucket as isize + range, halfedges));
            range += 1;
        }
        let mut he = found.unwrap_or(self.left_end);

        let is_left_of = |id: usize| match halfedges[id].edge {
            Some(e) => halfedges[id].is_left_of(p, &edges[e], sites),
            None => false,
        };

        if he == self.left_end || (he != self.right_end && is_left_of(he)) {
            loop {
                he = halfedges[he].right.unwrap_or(self.right_end);
                if he == self.right_end || !is_left_of(he) {
                    break;
                }
            }
            he = halfedges[he].left.unwrap_or(self.left_end);
        } else {
            loop {
                he = halfedges[he].left.unwrap_or(self.left_end);
                if he == self.left_end || is_left_of(he) {
                    break;
                }
            }
        }

        if bucket > 0 && bucket < hash_size - 1 {
            self.hash[bucket] = Some(he);
        }
        he
    }

    fn get_hash(&mut self, bucket: isize, halfedges: &[Halfedge]) -> Option<usize> {
        if bucket < 0 || bucket as usize >= self.hash.len() {
            return None;
        }
        let bucket = bucket as usize;
        let he = self.hash[bucket]?;
        if halfedges[he].deleted {
            self.hash[bucket] = None;
            return None;
        }
        Some(he)
    }
}
