//! # Region Classification
//!
//! Determines a region's biome from its averaged terrain sample.
//!
//! The rules form a priority cascade: the first matching rule wins, so a
//! very wet, very high cell is a `MountainPeak`, never a `Swamp`.

use serde::{Deserialize, Serialize};

use crate::terrain::TerrainSample;

/// Region biome types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RegionType {
    /// Temperate woodland
    Forest = 0,
    /// High, cold ground
    Mountain = 1,
    /// The highest ground
    MountainPeak = 2,
    /// High but temperate ground
    Hills = 3,
    /// Low, waterlogged ground
    Swamp = 4,
    /// Low, wet and warm ground
    Marsh = 5,
    /// Open grassland (catch-all)
    Meadows = 6,
    /// Hot and arid
    Desert = 7,
    /// Hot and wet
    Jungle = 8,
}

impl RegionType {
    /// Every region type.
    pub const ALL: [Self; 9] = [
        Self::Forest,
        Self::Mountain,
        Self::MountainPeak,
        Self::Hills,
        Self::Swamp,
        Self::Marsh,
        Self::Meadows,
        Self::Desert,
        Self::Jungle,
    ];

    /// Classifies a terrain sample. Total: every input gets exactly one type.
    #[must_use]
    pub fn classify(sample: &TerrainSample) -> Self {
        let TerrainSample { temperature: t, altitude: a, moisture: m } = *sample;

        if a > 0.8 {
            Self::MountainPeak
        } else if a > 0.6 && t < 0.4 {
            Self::Mountain
        } else if a > 0.6 {
            Self::Hills
        } else if a < 0.3 && m > 0.7 {
            Self::Swamp
        } else if a < 0.4 && m > 0.8 && t > 0.6 {
            Self::Marsh
        } else if m > 0.5 && t > 0.4 && t < 0.7 {
            Self::Forest
        } else if m > 0.6 && t > 0.7 {
            Self::Jungle
        } else if m < 0.3 && t > 0.6 {
            Self::Desert
        } else {
            Self::Meadows
        }
    }

    /// Single-character glyph for map dumps.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Forest => 'f',
            Self::Mountain => 'm',
            Self::MountainPeak => 'A',
            Self::Hills => 'h',
            Self::Swamp => 's',
            Self::Marsh => '~',
            Self::Meadows => '.',
            Self::Desert => 'd',
            Self::Jungle => 'j',
        }
    }
}

/// Inclusive `[min, max]` range on one terrain parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl ParameterRange {
    /// The full `[0, 1]` range.
    pub const FULL: Self = Self { min: 0.0, max: 1.0 };

    /// Creates a range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// A configured variant of a region type (art set, encounter tables, name).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionDefinition {
    /// Display name.
    pub name: String,
    /// Type this definition can be chosen for.
    pub region_type: RegionType,
    /// Accepted temperature.
    #[serde(default)]
    pub temperature: ParameterRange,
    /// Accepted altitude.
    #[serde(default)]
    pub altitude: ParameterRange,
    /// Accepted moisture.
    #[serde(default)]
    pub moisture: ParameterRange,
}

impl RegionDefinition {
    /// Creates a definition accepting any sample of its type.
    #[must_use]
    pub fn new(name: impl Into<String>, region_type: RegionType) -> Self {
        Self {
            name: name.into(),
            region_type,
            temperature: ParameterRange::FULL,
            altitude: ParameterRange::FULL,
            moisture: ParameterRange::FULL,
        }
    }

    /// Whether the sample lies inside all three ranges.
    #[must_use]
    pub fn accepts(&self, sample: &TerrainSample) -> bool {
        self.temperature.contains(sample.temperature)
            && self.altitude.contains(sample.altitude)
            && self.moisture.contains(sample.moisture)
    }

    /// One catch-all definition per region type.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        RegionType::ALL
            .iter()
            .map(|&region_type| Self::new(format!("{region_type:?}"), region_type))
            .collect()
    }
}
