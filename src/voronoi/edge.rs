//! Bisector edges and their clipping to the working rectangle

use crate::geometry::{LineSegment, Point, Rect};

/// Which side of a bisector an end, vertex or halfedge belongs to
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// The line `a·x + b·y = c` separating two sites
///
/// One of `a` or `b` is normalized to exactly 1.0 at construction, which the
/// sweep uses to pick the numerically stable form of the line.
#[derive(Debug, Clone)]
pub struct Edge {
    pub index: usize,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub(crate) sites: [usize; 2],
    pub(crate) vertices: [Option<usize>; 2],
    pub(crate) clipped: Option<[Point; 2]>,
}

impl Edge {
    /// Perpendicular bisector between two sites
    pub(crate) fn bisect(index: usize, site0: usize, p0: Point, site1: usize, p1: Point) -> Self {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let mut c = p0.x * dx + p0.y * dy + (dx * dx + dy * dy) * 0.5;
        let (a, b);
        if dx.abs() > dy.abs() {
            a = 1.0;
            b = dy / dx;
            c /= dx;
        } else {
            b = 1.0;
            a = dx / dy;
            c /= dy;
        }

        Self {
            index,
            a,
            b,
            c,
            sites: [site0, site1],
            vertices: [None, None],
            clipped: None,
        }
    }

    /// True when the line was normalized on its x coefficient
    #[inline]
    pub(crate) fn is_x_normalized(&self) -> bool {
        self.a == 1.0
    }

    /// Sweep id of the site on the given side
    #[inline]
    pub fn site(&self, side: Side) -> usize {
        self.sites[side.slot()]
    }

    /// Confirmed Voronoi vertex on the given side, absent for an unbounded end
    #[inline]
    pub fn vertex(&self, side: Side) -> Option<usize> {
        self.vertices[side.slot()]
    }

    pub(crate) fn set_vertex(&mut self, side: Side, vertex: usize) {
        self.vertices[side.slot()] = Some(vertex);
    }

    /// Whether any part of the edge survived clipping
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.clipped.is_some()
    }

    pub fn clipped_end(&self, side: Side) -> Option<Point> {
        self.clipped.map(|ends| ends[side.slot()])
    }

    /// Clipped segment from the left end to the right end
    pub fn clipped_segment(&self) -> Option<LineSegment> {
        self.clipped.map(|[l, r]| LineSegment::new(l, r))
    }

    /// Clip the edge against `bounds`, substituting the rectangle boundary for
    /// missing vertices. Leaves the edge invisible when nothing remains inside.
    pub(crate) fn clip(&mut self, vertex_coord: impl Fn(usize) -> Point, bounds: &Rect) {
        self.clipped = None;
        let (xmin, ymin, xmax, ymax) = (bounds.left(), bounds.top(), bounds.right(), bounds.bottom());

        let (vertex0, vertex1) = if self.is_x_normalized() && self.b >= 0.0 {
            (self.vertices[1], self.vertices[0])
        } else {
            (self.vertices[0], self.vertices[1])
        };
        let v0 = vertex0.map(&vertex_coord);
        let v1 = vertex1.map(&vertex_coord);
        let (a, b, c) = (self.a, self.b, self.c);

        let (mut x0, mut y0, mut x1, mut y1);
        if self.is_x_normalized() {
            y0 = ymin;
            if let Some(v) = v0 {
                if v.y > ymin {
                    y0 = v.y;
                }
            }
            if y0 > ymax {
                return;
            }
            x0 = c - b * y0;

            y1 = ymax;
            if let Some(v) = v1 {
                if v.y < ymax {
                    y1 = v.y;
                }
            }
            if y1 < ymin {
                return;
            }
            x1 = c - b * y1;

            if (x0 > xmax && x1 > xmax) || (x0 < xmin && x1 < xmin) {
                return;
            }

            if x0 > xmax {
                x0 = xmax;
                y0 = (c - x0) / b;
            } else if x0 < xmin {
                x0 = xmin;
                y0 = (c - x0) / b;
            }

            if x1 > xmax {
                x1 = xmax;
                y1 = (c - x1) / b;
            } else if x1 < xmin {
                x1 = xmin;
                y1 = (c - x1) / b;
            }
        } else {
            x0 = xmin;
            if let Some(v) = v0 {
                if v.x > xmin {
                    x0 = v.x;
                }
            }
            if x0 > xmax {
                return;
            }
            y0 = c - a * x0;

            x1 = xmax;
            if let Some(v) = v1 {
                if v.x < xmax {
                    x1 = v.x;
                }
            }
            if x1 < xmin {
                return;
            }
            y1 = c - a * x1;

            if (y0 > ymax && y1 > ymax) || (y0 < ymin && y1 < ymin) {
                return;
            }

            if y0 > ymax {
                y0 = ymax;
                x0 = (c - y0) / a;
            } else if y0 < ymin {
                y0 = ymin;
                x0 = (c - y0) / a;
            }

            if y1 > ymax {
                y1 = ymax;
                x1 = (c - y1) / a;
            } else if y1 < ymin {
                y1 = ymin;
                x1 = (c - y1) / a;
            }
        }

        let near = Point::new(x0, y0);
        let far = Point::new(x1, y1);
        if !(near.is_finite() && far.is_finite()) {
            return;
        }
        self.clipped = if vertex0 == self.vertices[0] {
            Some([near, far])
        } else {
            Some([far, near])
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisector_is_equidistant() {
        let p0 = Point::new(1.0, 1.0);
        let p1 = Point::new(5.0, 3.0);
        let edge = Edge::bisect(0, 0, p0, 1, p1);
        assert!(edge.is_x_normalized());

        // Any point on the line is equidistant from both sites
        let y = 7.0;
        let x = edge.c - edge.b * y;
        let q = Point::new(x, y);
        assert!((q.distance(p0) - q.distance(p1)).abs() < 1e-9);
    }

    #[test]
    fn test_unbounded_edge_clips_to_rect() {
        let bounds = Rect::square(10.0);
        let mut edge = Edge::bisect(0, 0, Point::new(2.0, 5.0), 1, Point::new(8.0, 5.0));
        edge.clip(|_| Point::ZERO, &bounds);

        let segment = edge.clipped_segment().expect("vertical bisector crosses the square");
        for p in [segment.p0, segment.p1] {
            assert!((p.x - 5.0).abs() < 1e-12);
            assert!(bounds.is_on_boundary(p));
        }
    }

    #[test]
    fn test_edge_outside_is_invisible() {
        let bounds = Rect::square(10.0);
        let mut edge = Edge::bisect(0, 0, Point::new(20.0, 5.0), 1, Point::new(30.0, 5.0));
        edge.clip(|_| Point::ZERO, &bounds);
        assert!(!edge.is_visible());
        assert_eq!(edge.clipped_end(Side::Left), None);
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Left.other(), Side::Right);
        assert_eq!(Side::Right.other().other(), Side::Right);
    }
}
