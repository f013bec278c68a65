//! Island main structure

use crate::config::{IslandConfig, IslandConfigBuilder, MapSize};
use crate::error::{IslandError, Result};
use crate::generation::generate_sites;
use crate::geometry::Point;
use crate::graph::{build_graph, Center, Graph};
use crate::terrain::{run_pipeline, PipelineReport};
use crate::voronoi::Voronoi;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A generated island: the terrain graph plus how it was made
///
/// The graph is read-only once generation completes.
///
/// # Examples
///
/// ```
/// use voronoi_island::*;
///
/// let config = IslandConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Tiny)
///     .build()
///     .unwrap();
///
/// let island = Island::generate(config).unwrap();
/// println!("Generated {} cells", island.center_count());
///
/// if let Some(center) = island.get_center(0) {
///     println!("Cell 0 biome: {}", center.biome.name());
/// }
/// ```
#[derive(Clone)]
pub struct Island {
    config: IslandConfig,
    graph: Graph,
    report: PipelineReport,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Island {
    /// Generate an island from a configuration
    ///
    /// Sites come from `config.seed`; the terrain from `config.terrain_seed`.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_island::*;
    ///
    /// let config = IslandConfigBuilder::new()
    ///     .seed(12345)
    ///     .map_size(MapSize::Tiny)
    ///     .lloyd_iterations(1)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let island = Island::generate(config).unwrap();
    /// assert!(island.center_count() > 0);
    /// ```
    pub fn generate(config: IslandConfig) -> Result<Self> {
        let points = generate_sites(&config);
        Self::generate_from_points(config, &points)
    }

    /// Generate an island over an explicit site set
    ///
    /// Lloyd's relaxation is not applied; `config.point_count` and
    /// `config.seed` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `points` is empty, or holds a non-finite
    /// position or one outside the map, and `InvariantViolation` if
    /// generation breaks a graph guarantee.
    pub fn generate_from_points(config: IslandConfig, points: &[Point]) -> Result<Self> {
        let bounds = config.bounds();
        if !bounds.is_valid() {
            return Err(IslandError::InvalidInput(format!(
                "degenerate map rectangle {:?}",
                bounds
            )));
        }
        if points.is_empty() {
            return Err(IslandError::InvalidInput("no sites".to_string()));
        }
        if let Some((i, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || !bounds.contains(**p))
        {
            return Err(IslandError::InvalidInput(format!(
                "site {} at {:?} is outside the map",
                i, p
            )));
        }

        let voronoi = Voronoi::new(points, bounds);
        let mut graph = build_graph(points, &voronoi)?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.terrain_seed);
        let report = run_pipeline(&mut graph, &config, &mut rng)?;

        // Repeated sites own no polygon and stay out of the index
        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::from_entries(
            graph
                .centers()
                .iter()
                .filter(|c| !c.corners.is_empty())
                .map(|c| (c.index, c.position)),
        );

        tracing::info!(
            target: "voronoi_island::island",
            seed = config.seed,
            terrain_seed = config.terrain_seed,
            centers = graph.centers().len(),
            corners = graph.corners().len(),
            edges = graph.edges().len(),
            "island.generated"
        );

        Ok(Self {
            config,
            graph,
            report,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Configuration used to generate this island
    #[inline]
    pub fn config(&self) -> &IslandConfig {
        &self.config
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// What the terrain pipeline did
    #[inline]
    pub fn report(&self) -> &PipelineReport {
        &self.report
    }

    #[inline]
    pub fn center_count(&self) -> usize {
        self.graph.centers().len()
    }

    /// Returns `None` if the id is out of range
    #[inline]
    pub fn get_center(&self, id: usize) -> Option<&Center> {
        self.graph.centers().get(id)
    }

    /// Neighbor ids of a center; empty for an invalid id
    pub fn get_neighbors(&self, center_id: usize) -> &[usize] {
        self.graph
            .centers()
            .get(center_id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Center whose site is nearest to `position`
    ///
    /// Uses the KD-tree with the `spatial-index` feature and a linear scan
    /// without it.
    pub fn find_center_at(&self, position: Point) -> usize {
        #[cfg(feature = "spatial-index")]
        {
            self.spatial_index.find_nearest(position)
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            self.graph.nearest_center(position).unwrap_or_default()
        }
    }

    /// Center whose polygon contains `position`
    ///
    /// Tries the nearest site's cell and then its neighbors. Falls back to
    /// the nearest center when no polygon claims the point (on a shared
    /// boundary, say).
    ///
    /// # Example
    ///
    /// ```
    /// # use voronoi_island::*;
    /// # let island = Island::generate(
    /// #     IslandConfigBuilder::new().seed(1).map_size(MapSize::Tiny).build().unwrap(),
    /// # ).unwrap();
    /// let id = island.center_containing(Point::new(20.0, 20.0));
    /// println!("clicked {}", island.graph().center(id).biome.name());
    /// ```
    pub fn center_containing(&self, position: Point) -> usize {
        let nearest = self.find_center_at(position);
        let center = self.graph.center(nearest);
        if center.contains(position, &self.graph) {
            return nearest;
        }
        center
            .neighbors
            .iter()
            .copied()
            .find(|&n| self.graph.center(n).contains(position, &self.graph))
            .unwrap_or(nearest)
    }

    /// Centers within `hops` neighbor steps of `center_id`, including it
    ///
    /// # Errors
    ///
    /// Returns `CenterNotFound` for an invalid id
    pub fn centers_within_hops(&self, center_id: usize, hops: usize) -> Result<Vec<usize>> {
        if center_id >= self.center_count() {
            return Err(IslandError::CenterNotFound(center_id));
        }

        let mut visited = std::collections::HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &id in &current {
                for &neighbor in self.get_neighbors(id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut found: Vec<usize> = visited.into_iter().collect();
        found.sort_unstable();
        Ok(found)
    }
}

/// Generate an island from the five basic parameters
///
/// Uses a square map of side `size` and the default for everything else.
///
/// # Errors
///
/// Returns `InvalidConfig` for a non-positive size, a ratio or threshold
/// outside [0, 1], or a zero river count.
///
/// # Example
///
/// ```
/// let island = voronoi_island::generate(7, 64.0, 0.5, 10, 0.3).unwrap();
/// assert_eq!(island.report().rivers_requested, 10);
/// ```
pub fn generate(
    seed: u64,
    size: f64,
    land_ratio: f64,
    river_count: usize,
    lake_threshold: f64,
) -> Result<Island> {
    let config = IslandConfigBuilder::new()
        .seed(seed)
        .map_size(MapSize::Custom { size })
        .land_ratio(land_ratio)?
        .river_count(river_count)?
        .lake_threshold(lake_threshold)?
        .build()?;
    Island::generate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::terrain::Biome;

    fn tiny(seed: u64) -> Island {
        let config = IslandConfigBuilder::new()
            .seed(seed)
            .map_size(MapSize::Tiny)
            .build()
            .unwrap();
        Island::generate(config).unwrap()
    }

    #[test]
    fn test_island_generation() {
        let island = tiny(42);
        assert_eq!(island.center_count(), island.config().point_count());
        island.graph().validate_terrain().unwrap();
    }

    #[test]
    fn test_get_center() {
        let island = tiny(42);
        assert!(island.get_center(0).is_some());
        assert!(island.get_center(island.center_count()).is_none());
        assert!(island.get_neighbors(island.center_count()).is_empty());
    }

    #[test]
    fn test_single_point_island() {
        let config = IslandConfigBuilder::new()
            .seed(1)
            .map_size(MapSize::Tiny)
            .build()
            .unwrap();
        let island = Island::generate_from_points(config, &[Point::new(32.0, 32.0)]).unwrap();
        let graph = island.graph();

        assert_eq!(graph.centers().len(), 1);
        let center = graph.center(0);
        assert_eq!(center.corners.len(), 4);
        for p in Rect::square(64.0).corners() {
            assert!(center.polygon(graph).contains(&p));
        }
        for &k in &center.corners {
            assert!(graph.corner(k).border && graph.corner(k).ocean);
        }
        assert_eq!(center.biome, Biome::Ocean);
    }

    #[test]
    fn test_invalid_points_rejected() {
        let config = IslandConfigBuilder::new()
            .seed(1)
            .map_size(MapSize::Tiny)
            .build()
            .unwrap();
        assert!(matches!(
            Island::generate_from_points(config, &[]),
            Err(IslandError::InvalidInput(_))
        ));
        assert!(matches!(
            Island::generate_from_points(config, &[Point::new(f64::NAN, 1.0)]),
            Err(IslandError::InvalidInput(_))
        ));
        assert!(matches!(
            Island::generate_from_points(config, &[Point::new(100.0, 1.0)]),
            Err(IslandError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_duplicate_points_tolerated() {
        let config = IslandConfigBuilder::new()
            .seed(1)
            .map_size(MapSize::Tiny)
            .build()
            .unwrap();
        let points = [
            Point::new(10.0, 10.0),
            Point::new(50.0, 12.0),
            Point::new(10.0, 10.0),
            Point::new(30.0, 50.0),
            Point::new(32.0, 30.0),
        ];
        let island = Island::generate_from_points(config, &points).unwrap();
        assert_eq!(island.center_count(), 5);
        assert!(island.graph().center(2).corners.is_empty());
        island.graph().validate_terrain().unwrap();

        let (twin, repeated) = (island.graph().center(0), island.graph().center(2));
        assert_eq!(repeated.water, twin.water);
        assert_eq!(repeated.ocean, twin.ocean);
        assert_eq!(repeated.biome, twin.biome);
        assert_eq!(island.find_center_at(Point::new(10.0, 10.0)), 0);
        assert_eq!(island.center_containing(Point::new(10.0, 10.0)), 0);
    }

    #[test]
    fn test_find_center_at_site() {
        let island = tiny(42);
        for center in island.graph().centers().iter().take(20) {
            assert_eq!(island.find_center_at(center.position), center.index);
        }
    }

    #[test]
    fn test_center_containing() {
        let island = tiny(5);
        let graph = island.graph();
        for center in graph.centers().iter().take(30) {
            let polygon = center.polygon(graph);
            // Midway between the site and a corner stays inside a convex cell
            let probe = (center.position + polygon[0]) * 0.5;
            assert_eq!(island.center_containing(probe), center.index);
        }
    }

    #[test]
    fn test_centers_within_hops() {
        let island = tiny(42);
        assert_eq!(island.centers_within_hops(0, 0).unwrap(), vec![0]);

        let r1 = island.centers_within_hops(0, 1).unwrap();
        assert_eq!(r1.len(), 1 + island.get_neighbors(0).len());
        let r2 = island.centers_within_hops(0, 2).unwrap();
        assert!(r2.len() > r1.len());

        assert_eq!(
            island.centers_within_hops(999_999, 3),
            Err(IslandError::CenterNotFound(999_999))
        );
    }

    #[test]
    fn test_generate_entry_point() {
        let island = generate(3, 128.0, 0.4, 12, 0.3).unwrap();
        assert_eq!(island.config().map_size.side(), 128.0);
        assert_eq!(island.report().rivers_requested, 12);
        assert!(island.report().land_centers > 0);

        assert!(matches!(generate(3, 0.0, 0.4, 12, 0.3), Err(IslandError::InvalidConfig(_))));
        assert!(matches!(generate(3, 64.0, 1.5, 12, 0.3), Err(IslandError::InvalidConfig(_))));
        assert!(matches!(generate(3, 64.0, 0.4, 0, 0.3), Err(IslandError::InvalidConfig(_))));
    }

    #[test]
    fn test_biome_variety() {
        let island = tiny(42);
        let mut counts = std::collections::HashMap::new();
        for center in island.graph().centers() {
            *counts.entry(center.biome).or_insert(0) += 1;
        }
        assert!(counts.len() > 1, "should have varied biomes");
        assert!(counts.get(&Biome::Ocean).copied().unwrap_or(0) > 0);
    }
}
