//! Sweep input sites and the sorted site stream

use std::cmp::Ordering;

use crate::geometry::{Point, Rect};

/// Sweep ordering: ascending y, ties broken by ascending x
pub(crate) fn compare_y_then_x(a: Point, b: Point) -> Ordering {
    a.y.partial_cmp(&b.y)
        .unwrap_or(Ordering::Equal)
        .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
}

/// An input point generating one Voronoi cell
#[derive(Debug, Clone)]
pub struct Site {
    pub(crate) coord: Point,
    pub(crate) index: usize,
    pub(crate) edges: Vec<usize>,
}

impl Site {
    /// Site position
    #[inline]
    pub fn coord(&self) -> Point {
        self.coord
    }

    /// Index of this site in the caller's input slice
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Indices of the bisector edges bounding this site's cell
    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }
}

/// Sites in sweep order with exact duplicates removed
pub(crate) struct SiteList {
    sites: Vec<Site>,
    cursor: usize,
}

impl SiteList {
    pub(crate) fn new(points: &[Point]) -> Self {
        let mut sites: Vec<Site> = points
            .iter()
            .enumerate()
            .map(|(index, &coord)| Site {
                coord,
                index,
                edges: Vec::new(),
            })
            .collect();

        // Stable sort keeps the first input occurrence of a duplicated position
        sites.sort_by(|a, b| compare_y_then_x(a.coord, b.coord));
        sites.dedup_by(|later, earlier| later.coord == earlier.coord);

        Self { sites, cursor: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.sites.len()
    }

    /// Next site in sweep order
    pub(crate) fn next(&mut self) -> Option<usize> {
        if self.cursor < self.sites.len() {
            self.cursor += 1;
            Some(self.cursor - 1)
        } else {
            None
        }
    }

    /// Bounding box of all sites
    pub(crate) fn data_bounds(&self) -> Rect {
        let (Some(first), Some(last)) = (self.sites.first(), self.sites.last()) else {
            return Rect::new(0.0, 0.0, 0.0, 0.0);
        };
        let xmin = self.sites.iter().map(|s| s.coord.x).fold(f64::INFINITY, f64::min);
        let xmax = self
            .sites
            .iter()
            .map(|s| s.coord.x)
            .fold(f64::NEG_INFINITY, f64::max);
        Rect::new(xmin, first.coord.y, xmax - xmin, last.coord.y - first.coord.y)
    }

    pub(crate) fn into_sites(self) -> Vec<Site> {
        self.sites
    }

    pub(crate) fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub(crate) fn sites_mut(&mut self) -> &mut [Site] {
        &mut self.sites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_y_then_x() {
        let points = vec![
            Point::new(5.0, 2.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 0.5),
        ];
        let mut list = SiteList::new(&points);
        let mut order = Vec::new();
        while let Some(id) = list.next() {
            order.push(list.sites()[id].index);
        }
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_duplicates_dropped_keeping_first() {
        let points = vec![
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(1.0, 1.0),
        ];
        let list = SiteList::new(&points);
        assert_eq!(list.len(), 2);
        assert_eq!(list.sites()[0].index, 0);
    }

    #[test]
    fn test_data_bounds() {
        let points = vec![Point::new(4.0, 1.0), Point::new(-2.0, 3.0), Point::new(0.0, 9.0)];
        let bounds = SiteList::new(&points).data_bounds();
        assert_eq!(bounds, Rect::new(-2.0, 1.0, 6.0, 8.0));
    }
}
