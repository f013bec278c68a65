//! Candidate Voronoi vertices produced by breakpoint intersection

use crate::geometry::Point;

/// Determinant magnitude below which two bisectors are treated as parallel
pub(crate) const PARALLEL_EPSILON: f64 = 1e-10;

/// A breakpoint intersection; `index` is assigned once a circle event confirms it
#[derive(Debug, Clone, Copy)]
pub(crate) struct Vertex {
    pub coord: Point,
    pub index: Option<usize>,
}

impl Vertex {
    /// Candidate at `(x, y)`, or `None` when the coordinates are not finite
    pub(crate) fn create(x: f64, y: f64) -> Option<Self> {
        if x.is_finite() && y.is_finite() {
            Some(Self {
                coord: Point::new(x, y),
                index: None,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_vertex_is_rejected() {
        assert!(Vertex::create(f64::NAN, 1.0).is_none());
        assert!(Vertex::create(1.0, f64::INFINITY).is_none());
        let v = Vertex::create(2.0, 3.0).unwrap();
        assert_eq!(v.coord, Point::new(2.0, 3.0));
        assert_eq!(v.index, None);
    }
}
