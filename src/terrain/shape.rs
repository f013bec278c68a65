//! Island outline predicates
//!
//! A shape decides whether a map position is land for a given sea level.
//! Raising the sea level always shrinks the land, which is what calibration
//! relies on.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use rand::Rng;

use super::perlin::{sample_perlin_2d, PerlinConfig};
use crate::config::IslandShapeKind;
use crate::geometry::{Point, Rect};

/// Sea level every shape is tuned around
pub const DEFAULT_SEA_LEVEL: f64 = 0.5;

/// Land/water predicate over map coordinates
pub trait IslandShape {
    /// Whether `point` is land at `sea_level`
    fn is_land(&self, point: Point, sea_level: f64) -> bool;
}

/// Map a position to normalized coordinates, -1..1 on both axes
#[inline]
fn normalize(bounds: &Rect, point: Point) -> DVec2 {
    let rel = (point - DVec2::new(bounds.x, bounds.y)) / DVec2::new(bounds.width, bounds.height);
    rel * 2.0 - DVec2::ONE
}

/// Fractal noise plus a bonus that falls off from the map center
#[derive(Debug, Clone)]
pub struct PerlinShape {
    bounds: Rect,
    seed: u32,
    offset: DVec2,
    config: PerlinConfig,
}

impl PerlinShape {
    /// Peak of the center bonus
    pub const CENTER_BONUS: f64 = 0.25;

    pub fn new<R: Rng + ?Sized>(bounds: Rect, rng: &mut R) -> Self {
        let offset = DVec2::splat(rng.gen::<f64>() * 10000.0);
        Self {
            bounds,
            seed: rng.gen(),
            offset,
            config: PerlinConfig::default(),
        }
    }

    /// Shape value before the sea level cut
    pub fn height(&self, point: Point) -> f64 {
        let q = normalize(&self.bounds, point);
        let rel = (q + DVec2::ONE) * 0.5;
        let noise = sample_perlin_2d(rel + self.offset, self.seed, &self.config);
        noise + Self::CENTER_BONUS * (1.0 - q.length_squared())
    }
}

impl IslandShape for PerlinShape {
    fn is_land(&self, point: Point, sea_level: f64) -> bool {
        self.height(point) > sea_level
    }
}

/// Overlapping sine waves around the map center
#[derive(Debug, Clone)]
pub struct RadialShape {
    bounds: Rect,
    bumps: f64,
    start_angle: f64,
    dip_angle: f64,
    dip_width: f64,
}

impl RadialShape {
    /// 1.0 means no small islands; larger values give more
    pub const ISLAND_FACTOR: f64 = 1.07;

    pub fn new<R: Rng + ?Sized>(bounds: Rect, rng: &mut R) -> Self {
        Self {
            bounds,
            bumps: rng.gen_range(1..=5) as f64,
            start_angle: rng.gen_range(0.0..TAU),
            dip_angle: rng.gen_range(0.0..TAU),
            dip_width: rng.gen_range(0.2..0.7),
        }
    }
}

impl IslandShape for RadialShape {
    fn is_land(&self, point: Point, sea_level: f64) -> bool {
        let q = normalize(&self.bounds, point);
        let angle = q.y.atan2(q.x);
        let length = 0.5 * (q.x.abs().max(q.y.abs()) + q.length()) + (sea_level - DEFAULT_SEA_LEVEL);

        let phase = self.start_angle + self.bumps * angle;
        let mut r1 = 0.5 + 0.40 * (phase + ((self.bumps + 3.0) * angle).cos()).sin();
        let mut r2 = 0.7 - 0.20 * (phase - ((self.bumps + 2.0) * angle).sin()).sin();

        let dip = angle - self.dip_angle;
        if [dip, dip + 2.0 * PI, dip - 2.0 * PI]
            .iter()
            .any(|d| d.abs() < self.dip_width)
        {
            r1 = 0.2;
            r2 = 0.2;
        }
        length < r1 || (length > r1 * Self::ISLAND_FACTOR && length < r2)
    }
}

/// Everything is land
#[derive(Debug, Clone, Copy, Default)]
pub struct SquareShape;

impl IslandShape for SquareShape {
    fn is_land(&self, _point: Point, _sea_level: f64) -> bool {
        true
    }
}

/// Build the shape for `kind`, drawing its parameters from `rng`
pub fn make_shape<R: Rng + ?Sized>(
    kind: IslandShapeKind,
    bounds: Rect,
    rng: &mut R,
) -> Box<dyn IslandShape> {
    match kind {
        IslandShapeKind::Perlin => Box::new(PerlinShape::new(bounds, rng)),
        IslandShapeKind::Radial => Box::new(RadialShape::new(bounds, rng)),
        IslandShapeKind::Square => Box::new(SquareShape),
    }
}
