//! Biome classification from elevation and moisture

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// Whittaker-style biome of a cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Biome {
    #[default]
    Ocean,
    Lake,
    Ice,
    Marsh,
    Beach,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    TemperateDesert,
    TemperateRainForest,
    TemperateDeciduousForest,
    Grassland,
    TropicalRainForest,
    TropicalSeasonalForest,
    SubtropicalDesert,
}

impl Biome {
    /// All biomes, in declaration order
    pub const ALL: [Biome; 18] = [
        Biome::Ocean,
        Biome::Lake,
        Biome::Ice,
        Biome::Marsh,
        Biome::Beach,
        Biome::Snow,
        Biome::Tundra,
        Biome::Bare,
        Biome::Scorched,
        Biome::Taiga,
        Biome::Shrubland,
        Biome::TemperateDesert,
        Biome::TemperateRainForest,
        Biome::TemperateDeciduousForest,
        Biome::Grassland,
        Biome::TropicalRainForest,
        Biome::TropicalSeasonalForest,
        Biome::SubtropicalDesert,
    ];

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Lake => "Lake",
            Biome::Ice => "Ice",
            Biome::Marsh => "Marsh",
            Biome::Beach => "Beach",
            Biome::Snow => "Snow",
            Biome::Tundra => "Tundra",
            Biome::Bare => "Bare",
            Biome::Scorched => "Scorched",
            Biome::Taiga => "Taiga",
            Biome::Shrubland => "Shrubland",
            Biome::TemperateDesert => "Temperate Desert",
            Biome::TemperateRainForest => "Temperate Rain Forest",
            Biome::TemperateDeciduousForest => "Temperate Deciduous Forest",
            Biome::Grassland => "Grassland",
            Biome::TropicalRainForest => "Tropical Rain Forest",
            Biome::TropicalSeasonalForest => "Tropical Seasonal Forest",
            Biome::SubtropicalDesert => "Subtropical Desert",
        }
    }

    /// Check if this biome is open water
    pub fn is_water(self) -> bool {
        matches!(self, Biome::Ocean | Biome::Lake | Biome::Ice | Biome::Marsh)
    }
}

/// Decision table over a cell's flags, elevation and moisture
pub fn classify(ocean: bool, coast: bool, water: bool, elevation: f64, moisture: f64) -> Biome {
    if ocean {
        return Biome::Ocean;
    }
    if water {
        return if elevation > 0.8 {
            Biome::Ice
        } else if elevation > 0.1 {
            Biome::Lake
        } else {
            Biome::Marsh
        };
    }
    if coast {
        return Biome::Beach;
    }

    if elevation > 0.8 {
        if moisture > 0.5 {
            Biome::Snow
        } else if moisture > 0.33 {
            Biome::Tundra
        } else if moisture > 0.16 {
            Biome::Bare
        } else {
            Biome::Scorched
        }
    } else if elevation > 0.6 {
        if moisture > 0.66 {
            Biome::Taiga
        } else if moisture > 0.33 {
            Biome::Shrubland
        } else {
            Biome::TemperateDesert
        }
    } else if elevation > 0.3 {
        if moisture > 0.83 {
            Biome::TemperateRainForest
        } else if moisture > 0.5 {
            Biome::TemperateDeciduousForest
        } else if moisture > 0.16 {
            Biome::Grassland
        } else {
            Biome::TemperateDesert
        }
    } else if moisture > 0.66 {
        Biome::TropicalRainForest
    } else if moisture > 0.33 {
        Biome::TropicalSeasonalForest
    } else if moisture > 0.16 {
        Biome::Grassland
    } else {
        Biome::SubtropicalDesert
    }
}

/// Classify every center
pub fn assign_biomes(graph: &mut Graph) {
    for center in &mut graph.centers {
        center.biome = classify(
            center.ocean,
            center.coast,
            center.water,
            center.elevation,
            center.moisture,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_land_table() {
        assert_eq!(classify(false, false, false, 0.85, 0.6), Biome::Snow);
        assert_eq!(classify(false, false, false, 0.85, 0.4), Biome::Tundra);
        assert_eq!(classify(false, false, false, 0.85, 0.1), Biome::Scorched);
        assert_eq!(classify(false, false, false, 0.7, 0.7), Biome::Taiga);
        assert_eq!(classify(false, false, false, 0.7, 0.2), Biome::TemperateDesert);
        assert_eq!(classify(false, false, false, 0.5, 0.9), Biome::TemperateRainForest);
        assert_eq!(classify(false, false, false, 0.5, 0.6), Biome::TemperateDeciduousForest);
        assert_eq!(classify(false, false, false, 0.5, 0.3), Biome::Grassland);
        assert_eq!(classify(false, false, false, 0.1, 0.9), Biome::TropicalRainForest);
        assert_eq!(classify(false, false, false, 0.1, 0.5), Biome::TropicalSeasonalForest);
        assert_eq!(classify(false, false, false, 0.1, 0.1), Biome::SubtropicalDesert);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly on a band edge falls into the lower band
        assert_eq!(classify(false, false, false, 0.8, 0.5), Biome::Shrubland);
        assert_eq!(classify(false, false, false, 0.3, 0.16), Biome::SubtropicalDesert);
    }

    #[test]
    fn test_flags_short_circuit() {
        assert_eq!(classify(true, false, true, 0.9, 0.9), Biome::Ocean);
        assert_eq!(classify(false, true, false, 0.9, 0.9), Biome::Beach);
        assert_eq!(classify(false, false, true, 0.9, 0.0), Biome::Ice);
        assert_eq!(classify(false, false, true, 0.5, 0.0), Biome::Lake);
        assert_eq!(classify(false, false, true, 0.05, 0.0), Biome::Marsh);
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<&str> = Biome::ALL.iter().map(|b| b.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Biome::ALL.len());
    }
}
