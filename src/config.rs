//! Island Configuration and Builder
//!
//! This module provides configuration types for deterministic island generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{IslandError, Result};
use crate::generation::default_point_count;
use crate::geometry::Rect;

/// Map size presets
///
/// Each preset is the side length of the square working rectangle. The
/// default site count scales with the area (one site per 50 square units).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MapSize {
    /// 64×64, ~80 cells
    Tiny,
    /// 128×128, ~330 cells
    Small,
    /// 256×256, ~1,300 cells
    #[default]
    Medium,
    /// 512×512, ~5,200 cells
    Large,
    /// Custom square side length
    Custom {
        /// Side length in world units
        size: f64,
    },
}

impl MapSize {
    /// Side length of the square map
    pub fn side(self) -> f64 {
        match self {
            MapSize::Tiny => 64.0,
            MapSize::Small => 128.0,
            MapSize::Medium => 256.0,
            MapSize::Large => 512.0,
            MapSize::Custom { size } => size,
        }
    }

    /// Get a human-readable name for this map size
    pub fn name(self) -> &'static str {
        match self {
            MapSize::Tiny => "Tiny",
            MapSize::Small => "Small",
            MapSize::Medium => "Medium",
            MapSize::Large => "Large",
            MapSize::Custom { .. } => "Custom",
        }
    }
}

/// Island shape used by land/water calibration
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IslandShapeKind {
    /// Coherent noise with a radial falloff
    #[default]
    Perlin,
    /// Overlapping sine bumps around the map center
    Radial,
    /// Everything is land; the border still forces an ocean ring
    Square,
}

/// Configuration for deterministic island generation
///
/// The same configuration always produces the identical island.
///
/// # Example
///
/// ```rust
/// use voronoi_island::*;
///
/// let config = IslandConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Small)
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: IslandConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IslandConfig {
    /// Seed for site placement
    pub seed: u64,

    /// Seed for the terrain pipeline (shape noise, elevation jitter, river starts)
    ///
    /// This allows the same cell layout with different terrain.
    pub terrain_seed: u64,

    /// Map size preset
    pub map_size: MapSize,

    /// Explicit site count; defaults to `size² / 50` when unset
    pub point_count: Option<usize>,

    /// Number of Lloyd's Relaxation passes
    ///
    /// - 0: Raw random cells (irregular)
    /// - 2: Default
    pub lloyd_iterations: usize,

    /// Early-exit threshold for Lloyd's relaxation, as a fraction of the map side
    ///
    /// 0.0 runs every pass.
    pub lloyd_convergence: f64,

    /// Requested fraction of land corners, in [0, 1]
    pub land_ratio: f64,

    /// Number of river sources to trace
    pub river_count: usize,

    /// Fraction of water corners above which a cell becomes a lake
    pub lake_threshold: f64,

    /// Island shape
    pub shape: IslandShapeKind,
}

impl IslandConfig {
    /// Side length of the square map
    #[inline]
    pub fn size(&self) -> f64 {
        self.map_size.side()
    }

    /// Working rectangle
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::square(self.size())
    }

    /// Site count, explicit or derived from the map area
    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
            .unwrap_or_else(|| default_point_count(self.size()))
    }
}

impl Default for IslandConfig {
    fn default() -> Self {
        let size = MapSize::default().side();
        Self {
            seed: 0,
            terrain_seed: 0,
            map_size: MapSize::default(),
            point_count: None,
            lloyd_iterations: DEFAULT_LLOYD_ITERATIONS,
            lloyd_convergence: 0.0,
            land_ratio: DEFAULT_LAND_RATIO,
            river_count: default_river_count(size),
            lake_threshold: DEFAULT_LAKE_THRESHOLD,
            shape: IslandShapeKind::default(),
        }
    }
}

const DEFAULT_LLOYD_ITERATIONS: usize = 2;
const DEFAULT_LAND_RATIO: f64 = 0.5;
const DEFAULT_LAKE_THRESHOLD: f64 = 0.3;
const MAX_LLOYD_ITERATIONS: usize = 20;

fn default_river_count(size: f64) -> usize {
    ((size / 2.0) as usize).max(1)
}

/// Builder for creating IslandConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_island::*;
///
/// let config = IslandConfigBuilder::new()
///     .seed(12345)
///     .map_size(MapSize::Tiny)
///     .land_ratio(0.4)
///     .unwrap()
///     .river_count(10)
///     .unwrap()
///     .terrain_seed(67890)
///     .build()
///     .unwrap();
/// assert_eq!(config.river_count, 10);
/// ```
#[derive(Debug, Clone)]
pub struct IslandConfigBuilder {
    seed: Option<u64>,
    terrain_seed: Option<u64>,
    map_size: MapSize,
    point_count: Option<usize>,
    lloyd_iterations: usize,
    lloyd_convergence: f64,
    land_ratio: f64,
    river_count: Option<usize>,
    lake_threshold: f64,
    shape: IslandShapeKind,
}

impl IslandConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - terrain_seed: Same as seed
    /// - map_size: Medium (256×256)
    /// - point_count: size² / 50
    /// - lloyd_iterations: 2
    /// - land_ratio: 0.5
    /// - river_count: size / 2
    /// - lake_threshold: 0.3
    /// - shape: Perlin
    pub fn new() -> Self {
        Self {
            seed: None,
            terrain_seed: None,
            map_size: MapSize::default(),
            point_count: None,
            lloyd_iterations: DEFAULT_LLOYD_ITERATIONS,
            lloyd_convergence: 0.0,
            land_ratio: DEFAULT_LAND_RATIO,
            river_count: None,
            lake_threshold: DEFAULT_LAKE_THRESHOLD,
            shape: IslandShapeKind::default(),
        }
    }

    /// Set the random seed for site placement
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set a separate terrain seed
    ///
    /// If not set, the terrain seed will match the site seed.
    pub fn terrain_seed(mut self, seed: u64) -> Self {
        self.terrain_seed = Some(seed);
        self
    }

    /// Set the map size preset
    pub fn map_size(mut self, size: MapSize) -> Self {
        self.map_size = size;
        self
    }

    /// Set the number of sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0
    pub fn point_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(IslandError::InvalidConfig(
                "point count must be positive".to_string(),
            ));
        }
        self.point_count = Some(count);
        Ok(self)
    }

    /// Set the number of Lloyd's Relaxation passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > MAX_LLOYD_ITERATIONS {
            return Err(IslandError::InvalidConfig(format!(
                "Lloyd iterations must be <= {} (got {})",
                MAX_LLOYD_ITERATIONS, iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the early-exit threshold for Lloyd's relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if !(threshold >= 0.0) {
            return Err(IslandError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    /// Set the target land ratio
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if ratio is outside [0, 1]
    pub fn land_ratio(mut self, ratio: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(IslandError::InvalidConfig(format!(
                "land ratio must be within [0, 1] (got {})",
                ratio
            )));
        }
        self.land_ratio = ratio;
        Ok(self)
    }

    /// Set the number of rivers to trace
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0
    pub fn river_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(IslandError::InvalidConfig(
                "river count must be positive".to_string(),
            ));
        }
        self.river_count = Some(count);
        Ok(self)
    }

    /// Set the lake threshold
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is outside [0, 1]
    pub fn lake_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(IslandError::InvalidConfig(format!(
                "lake threshold must be within [0, 1] (got {})",
                threshold
            )));
        }
        self.lake_threshold = threshold;
        Ok(self)
    }

    /// Set the island shape
    pub fn shape(mut self, shape: IslandShapeKind) -> Self {
        self.shape = shape;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the map size is not a positive finite number
    pub fn build(self) -> Result<IslandConfig> {
        let size = self.map_size.side();
        if !(size.is_finite() && size > 0.0) {
            return Err(IslandError::InvalidConfig(format!(
                "map size must be positive (got {})",
                size
            )));
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let terrain_seed = self.terrain_seed.unwrap_or(seed);

        Ok(IslandConfig {
            seed,
            terrain_seed,
            map_size: self.map_size,
            point_count: self.point_count,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
            land_ratio: self.land_ratio,
            river_count: self.river_count.unwrap_or_else(|| default_river_count(size)),
            lake_threshold: self.lake_threshold,
            shape: self.shape,
        })
    }
}

impl Default for IslandConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_size_sides() {
        assert_eq!(MapSize::Tiny.side(), 64.0);
        assert_eq!(MapSize::Small.side(), 128.0);
        assert_eq!(MapSize::Medium.side(), 256.0);
        assert_eq!(MapSize::Large.side(), 512.0);
    }

    #[test]
    fn test_map_size_custom() {
        let custom = MapSize::Custom { size: 300.0 };
        assert_eq!(custom.side(), 300.0);
        assert_eq!(custom.name(), "Custom");
    }

    #[test]
    fn test_builder_defaults() {
        let config = IslandConfigBuilder::new().build().unwrap();
        assert_eq!(config.map_size, MapSize::Medium);
        assert_eq!(config.lloyd_iterations, 2);
        assert_eq!(config.land_ratio, 0.5);
        assert_eq!(config.river_count, 128);
        assert_eq!(config.lake_threshold, 0.3);
        assert_eq!(config.point_count(), 1310);
        assert_eq!(config.terrain_seed, config.seed);
    }

    #[test]
    fn test_builder_custom() {
        let config = IslandConfigBuilder::new()
            .seed(42)
            .map_size(MapSize::Small)
            .point_count(500)
            .unwrap()
            .lloyd_iterations(3)
            .unwrap()
            .terrain_seed(99)
            .shape(IslandShapeKind::Radial)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.terrain_seed, 99);
        assert_eq!(config.point_count(), 500);
        assert_eq!(config.lloyd_iterations, 3);
        assert_eq!(config.shape, IslandShapeKind::Radial);
        assert_eq!(config.bounds(), Rect::square(128.0));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(IslandConfigBuilder::new().point_count(0).is_err());
        assert!(IslandConfigBuilder::new().river_count(0).is_err());
        assert!(IslandConfigBuilder::new().land_ratio(1.5).is_err());
        assert!(IslandConfigBuilder::new().land_ratio(f64::NAN).is_err());
        assert!(IslandConfigBuilder::new().lake_threshold(-0.1).is_err());
        assert!(IslandConfigBuilder::new().lloyd_iterations(21).is_err());
        assert!(IslandConfigBuilder::new().lloyd_convergence(-1.0).is_err());
        assert!(IslandConfigBuilder::new()
            .map_size(MapSize::Custom { size: 0.0 })
            .build()
            .is_err());
    }

    #[test]
    fn test_boundary_ratios_accepted() {
        let config = IslandConfigBuilder::new()
            .land_ratio(0.0)
            .unwrap()
            .lake_threshold(1.0)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.land_ratio, 0.0);
        assert_eq!(config.lake_threshold, 1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = IslandConfigBuilder::new()
            .seed(7)
            .map_size(MapSize::Custom { size: 100.0 })
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let restored: IslandConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
