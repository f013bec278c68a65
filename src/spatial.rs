//! Spatial indexing for fast position-to-center lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::Point;

/// KD-tree over center positions
///
/// Provides O(log n) nearest-site lookups, used for point location and
/// interactive selection.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
    /// Center id of each tree item
    ids: Vec<usize>,
}

impl SpatialIndex {
    /// Build the index from site positions, indexed by slice position
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_island::*;
    ///
    /// let sites = vec![Point::new(10.0, 10.0), Point::new(50.0, 10.0), Point::new(30.0, 40.0)];
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Point::new(45.0, 12.0)), 1);
    /// ```
    pub fn new(sites: &[Point]) -> Self {
        Self::from_entries(sites.iter().copied().enumerate())
    }

    /// Build the index from `(id, position)` pairs
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, Point)>) -> Self {
        let (ids, points): (Vec<usize>, Vec<[f64; 2]>) =
            entries.into_iter().map(|(id, p)| (id, [p.x, p.y])).unzip();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            ids,
        }
    }

    /// Id of the site nearest to `position`
    pub fn find_nearest(&self, position: Point) -> usize {
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        self.ids[result.item as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spatial_index_basic() {
        let sites = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ];
        let index = SpatialIndex::new(&sites);

        assert_eq!(index.find_nearest(Point::new(1.0, 1.0)), 0);
        assert_eq!(index.find_nearest(Point::new(9.0, 0.5)), 1);
        assert_eq!(index.find_nearest(Point::new(0.5, 8.0)), 2);
        assert_eq!(index.find_nearest(Point::new(12.0, 12.0)), 3);
    }

    #[test]
    fn test_spatial_index_keeps_entry_ids() {
        let index = SpatialIndex::from_entries([
            (4, Point::new(0.0, 0.0)),
            (9, Point::new(10.0, 0.0)),
        ]);
        assert_eq!(index.find_nearest(Point::new(1.0, 1.0)), 4);
        assert_eq!(index.find_nearest(Point::new(8.0, 1.0)), 9);
    }

    #[test]
    fn test_spatial_index_matches_linear_scan() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let sites: Vec<Point> = (0..300)
            .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();
        let index = SpatialIndex::new(&sites);

        for _ in 0..200 {
            let q = Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
            let found = index.find_nearest(q);
            let best = sites
                .iter()
                .map(|s| s.distance_squared(q))
                .fold(f64::INFINITY, f64::min);
            assert_eq!(sites[found].distance_squared(q), best);
        }
    }
}
