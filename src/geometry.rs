//! Plane geometry primitives shared by the sweep and the terrain graph

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in the plane
pub type Point = DVec2;

/// Tolerance for deciding that a coordinate sits on the rectangle boundary
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Axis-aligned bounding rectangle
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Square rectangle anchored at the origin
    pub fn square(size: f64) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// True when the rectangle has a finite, strictly positive area
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() - BOUNDARY_EPSILON
            && p.x <= self.right() + BOUNDARY_EPSILON
            && p.y >= self.top() - BOUNDARY_EPSILON
            && p.y <= self.bottom() + BOUNDARY_EPSILON
    }

    pub fn is_on_boundary(&self, p: Point) -> bool {
        (p.x - self.left()).abs() <= BOUNDARY_EPSILON
            || (p.x - self.right()).abs() <= BOUNDARY_EPSILON
            || (p.y - self.top()).abs() <= BOUNDARY_EPSILON
            || (p.y - self.bottom()).abs() <= BOUNDARY_EPSILON
    }

    /// The four rectangle corners: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }
}

/// A bounded line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p0: Point,
    pub p1: Point,
}

impl LineSegment {
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    pub fn midpoint(&self) -> Point {
        (self.p0 + self.p1) * 0.5
    }

    pub fn length(&self) -> f64 {
        self.p0.distance(self.p1)
    }
}

/// Twice the signed area of a polygon (positive for counter-clockwise in a y-up frame)
pub fn signed_double_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

/// Even-odd ray casting test
pub fn polygon_contains(polygon: &[Point], p: Point) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
