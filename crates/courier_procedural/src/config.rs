//! # World Generation Config
//!
//! TOML description of one world: noise settings, grid layout, pins,
//! region definitions and default route preferences.
//!
//! ```toml
//! seed = 1234
//! resolution = 256
//! world_size_in_regions = 16
//!
//! [[pins]]
//! name = "Homestead"
//! position = { x = 0.2, y = 0.3 }
//! home_pin = true
//!
//! [[regions]]
//! name = "Pine Wood"
//! region_type = "forest"
//!
//! [route]
//! max_segment_distance = 4.0
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::{check_single_home, ChunkSettings};
use crate::error::{WorldGenError, WorldGenResult};
use crate::noise::WorldSeed;
use crate::pin::WorldPin;
use crate::region::{RegionDefinition, RegionType};
use crate::route::RoutePreferences;
use crate::terrain::TerrainSettings;

/// Upper bound on fractal octaves.
pub const MAX_OCTAVES: u32 = 16;

/// Full world-generation config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// World seed.
    pub seed: WorldSeed,
    /// Terrain cells per side.
    pub resolution: usize,
    /// Map-to-noise scale.
    pub noise_scale: f64,
    /// Fractal octaves.
    pub octaves: u32,
    /// Regions per side.
    pub world_size_in_regions: usize,
    /// World-space edge length of one region.
    pub region_world_size: f32,
    /// Terrain sub-samples per axis inside each region.
    pub subsamples_per_axis: usize,
    /// Designer pins.
    pub pins: Vec<WorldPin>,
    /// Region definitions; one catch-all per type when empty.
    pub regions: Vec<RegionDefinition>,
    /// Default route preferences.
    pub route: RoutePreferences,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        let terrain = TerrainSettings::default();
        let chunks = ChunkSettings::default();
        Self {
            seed: terrain.seed,
            resolution: terrain.resolution,
            noise_scale: terrain.noise_scale,
            octaves: terrain.octaves,
            world_size_in_regions: chunks.world_size_in_regions,
            region_world_size: chunks.region_world_size,
            subsamples_per_axis: chunks.subsamples_per_axis,
            pins: Vec::new(),
            regions: Vec::new(),
            route: RoutePreferences::default(),
        }
    }
}

impl WorldGenConfig {
    /// Parses and validates a config.
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed TOML, otherwise anything [`Self::validate`] reports.
    pub fn from_toml_str(content: &str) -> WorldGenResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> WorldGenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded world config from {} ({} pins, {} region definitions)",
            path.display(),
            config.pins.len(),
            config.regions.len()
        );
        Ok(config)
    }

    /// Checks ranges and cross-field invariants.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for an out-of-range value
    /// - `MultipleHomePins` if more than one pin is flagged home
    /// - `NoRegionDefinition` if `regions` is non-empty but misses a type
    pub fn validate(&self) -> WorldGenResult<()> {
        if self.resolution == 0 {
            return Err(invalid("resolution must be positive"));
        }
        if !is_positive(self.noise_scale) {
            return Err(invalid("noise_scale must be positive"));
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(invalid(format!("octaves must be in 1..={MAX_OCTAVES}")));
        }
        if self.world_size_in_regions == 0 {
            return Err(invalid("world_size_in_regions must be positive"));
        }
        if self.world_size_in_regions > self.resolution {
            return Err(invalid("world_size_in_regions cannot exceed resolution"));
        }
        if !is_positive(self.region_world_size) {
            return Err(invalid("region_world_size must be positive"));
        }
        if self.subsamples_per_axis == 0 {
            return Err(invalid("subsamples_per_axis must be positive"));
        }

        for pin in &self.pins {
            let inside = |t: f32| (0.0..=1.0).contains(&t);
            if !inside(pin.position.x) || !inside(pin.position.y) {
                return Err(invalid(format!("pin '{}' lies outside the [0, 1] map", pin.name)));
            }
            if pin.influence_radius < 0.0 || pin.influence_falloff <= 0.0 {
                return Err(invalid(format!("pin '{}' has a negative radius or non-positive falloff", pin.name)));
            }
        }
        check_single_home(&self.pins)?;

        if !self.regions.is_empty() {
            for region_type in RegionType::ALL {
                if !self.regions.iter().any(|def| def.region_type == region_type) {
                    return Err(WorldGenError::NoRegionDefinition(region_type));
                }
            }
        }

        let route = &self.route;
        if !is_positive(route.max_segment_distance) {
            return Err(invalid("route.max_segment_distance must be positive"));
        }
        if route.route_deviation < 0.0 || route.max_connection_distance < 0.0 {
            return Err(invalid("route distances cannot be negative"));
        }
        if !(0.0..=1.0).contains(&route.branch_chance) {
            return Err(invalid("route.branch_chance must be in [0, 1]"));
        }
        Ok(())
    }

    /// Settings for the terrain pass.
    #[must_use]
    pub fn terrain_settings(&self) -> TerrainSettings {
        TerrainSettings {
            resolution: self.resolution,
            noise_scale: self.noise_scale,
            seed: self.seed,
            octaves: self.octaves,
        }
    }

    /// Settings for the region pass.
    #[must_use]
    pub fn chunk_settings(&self) -> ChunkSettings {
        ChunkSettings {
            world_size_in_regions: self.world_size_in_regions,
            region_world_size: self.region_world_size,
            subsamples_per_axis: self.subsamples_per_axis,
            seed: self.seed,
        }
    }

    /// Configured region definitions, or one catch-all per type.
    #[must_use]
    pub fn region_definitions(&self) -> Vec<RegionDefinition> {
        if self.regions.is_empty() {
            RegionDefinition::defaults()
        } else {
            self.regions.clone()
        }
    }
}

/// False for zero, negatives and NaN.
fn is_positive<T: PartialOrd + Default>(value: T) -> bool {
    value > T::default()
}

fn invalid(message: impl Into<String>) -> WorldGenError {
    WorldGenError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = WorldGenConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldGenConfig::default());
        assert_eq!(config.region_definitions().len(), RegionType::ALL.len());
    }

    #[test]
    fn test_parses_pins_and_route() {
        let config = WorldGenConfig::from_toml_str(
            r#"
            seed = 99
            world_size_in_regions = 8

            [[pins]]
            name = "Homestead"
            position = { x = 0.2, y = 0.3 }
            home_pin = true
            influence = { temperature = 0.2, altitude = -0.5, moisture = 0.0 }
            influence_radius = 0.1

            [route]
            branch_chance = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, WorldSeed::new(99));
        assert_eq!(config.pins.len(), 1);
        assert!(config.pins[0].home_pin);
        assert_eq!(config.route.branch_chance, 0.0);
        assert_eq!(config.route.max_segment_distance, RoutePreferences::default().max_segment_distance);
        assert_eq!(config.chunk_settings().world_size_in_regions, 8);
    }

    #[test]
    fn test_rejects_two_home_pins() {
        let err = WorldGenConfig::from_toml_str(
            r#"
            [[pins]]
            name = "A"
            position = { x = 0.1, y = 0.1 }
            home_pin = true

            [[pins]]
            name = "B"
            position = { x = 0.9, y = 0.9 }
            home_pin = true
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, WorldGenError::MultipleHomePins { .. }));
    }

    #[test]
    fn test_rejects_missing_region_type() {
        let err = WorldGenConfig::from_toml_str(
            r#"
            [[regions]]
            name = "Pine Wood"
            region_type = "forest"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, WorldGenError::NoRegionDefinition(_)));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(WorldGenConfig::from_toml_str("resolution = 0").is_err());
        assert!(WorldGenConfig::from_toml_str("octaves = 0").is_err());
        assert!(WorldGenConfig::from_toml_str("[route]\nbranch_chance = 1.5").is_err());
        assert!(WorldGenConfig::from_toml_str(
            "[[pins]]\nname = \"Lost\"\nposition = { x = 1.5, y = 0.0 }"
        )
        .is_err());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = WorldGenConfig::from_toml_str("seed = \"not a number\"").unwrap_err();
        assert!(matches!(err, WorldGenError::ConfigParse(_)));
    }
}
