//! Unit-cell bucket grid for positional lookups

use std::collections::HashMap;

use crate::geometry::Point;

/// Items bucketed by truncated integer coordinate
///
/// A lookup searches the 3×3 block of buckets around the query, so any
/// tolerance below one unit finds matches across bucket seams.
#[derive(Debug, Default)]
pub(crate) struct BucketGrid {
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl BucketGrid {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn key(p: Point) -> (i64, i64) {
        (p.x as i64, p.y as i64)
    }

    pub(crate) fn insert(&mut self, p: Point, id: usize) {
        self.buckets.entry(Self::key(p)).or_default().push(id);
    }

    /// Closest item within `tolerance` of `p`, ties going to the lowest id
    pub(crate) fn find(
        &self,
        p: Point,
        tolerance: f64,
        position_of: impl Fn(usize) -> Point,
    ) -> Option<usize> {
        let (bx, by) = Self::key(p);
        let mut best: Option<(f64, usize)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(bx + dx, by + dy)) else {
                    continue;
                };
                for &id in bucket {
                    let d = position_of(id).distance(p);
                    if d >= tolerance {
                        continue;
                    }
                    let better = match best {
                        None => true,
                        Some((bd, bid)) => d < bd || (d == bd && id < bid),
                    };
                    if better {
                        best = Some((d, id));
                    }
                }
            }
        }
        best.map(|(_, id)| id)
    }
}
