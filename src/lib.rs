//! Voronoi-based island terrain generation
//!
//! Builds a polygon map from a Voronoi subdivision of random sites, then runs
//! a terrain pipeline over it: land and water, elevation, watersheds, rivers,
//! moisture and biomes. The result is a plain index-addressed graph that any
//! renderer or game engine can read.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_island::*;
//!
//! let config = IslandConfigBuilder::new()
//!     .seed(42)
//!     .map_size(MapSize::Medium)
//!     .land_ratio(0.45).unwrap()
//!     .build().unwrap();
//!
//! let island = Island::generate(config).unwrap();
//!
//! for center in island.graph().centers() {
//!     println!("{:?} {}", center.position, center.biome.name());
//! }
//! println!("{} rivers traced", island.report().rivers_traced);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-center lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, graph records and snapshots

// Modules
pub mod error;
pub mod geometry;
pub mod config;
pub mod generation;
pub mod voronoi;
pub mod graph;
pub mod terrain;
pub mod island;
pub mod snapshot;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{IslandError, Result};
pub use geometry::{LineSegment, Point, Rect};
pub use config::{IslandConfig, IslandConfigBuilder, IslandShapeKind, MapSize};
pub use generation::{generate_sites, lloyd_relaxation, random_points, LloydOptions};
pub use voronoi::Voronoi;
pub use graph::{build_graph, Center, Corner, Edge, Graph};
pub use terrain::{run_pipeline, Biome, Calibration, IslandShape, PipelineReport};
pub use island::{generate, Island};
pub use snapshot::IslandSnapshot;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
