//! # World Pins
//!
//! Designer-placed points of interest. A pin biases the terrain fields around
//! its position and may anchor a unique location in the region it lands in.

use courier_shared::Vec2;
use serde::{Deserialize, Serialize};

/// One of the three terrain fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainParameter {
    /// Heat, 0 = frozen, 1 = scorching.
    Temperature,
    /// Height, 0 = lowland, 1 = peak.
    Altitude,
    /// Wetness, 0 = arid, 1 = waterlogged.
    Moisture,
}

impl TerrainParameter {
    /// All parameters in field order.
    pub const ALL: [Self; 3] = [Self::Temperature, Self::Altitude, Self::Moisture];

    /// Seed-derivation purpose for this field's noise offset.
    #[must_use]
    pub const fn seed_purpose(self) -> u64 {
        match self {
            Self::Temperature => 0x7E,
            Self::Altitude => 0xA1,
            Self::Moisture => 0x30,
        }
    }
}

/// What kind of place a pin marks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    /// A settlement.
    Town,
    /// A natural or built landmark.
    #[default]
    Landmark,
    /// A small camp or waystation.
    Outpost,
    /// Abandoned structures.
    Ruin,
    /// A delivery point.
    DropOff,
}

/// Signed per-field influence weights, each in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceWeights {
    /// Temperature weight.
    pub temperature: f32,
    /// Altitude weight.
    pub altitude: f32,
    /// Moisture weight.
    pub moisture: f32,
}

impl InfluenceWeights {
    /// Weight for one parameter.
    #[must_use]
    pub const fn get(&self, parameter: TerrainParameter) -> f32 {
        match parameter {
            TerrainParameter::Temperature => self.temperature,
            TerrainParameter::Altitude => self.altitude,
            TerrainParameter::Moisture => self.moisture,
        }
    }
}

fn default_falloff() -> f32 {
    1.0
}

/// A designer-authored point source on the normalized world map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPin {
    /// Display name.
    pub name: String,
    /// Position in `[0, 1]²` map space.
    pub position: Vec2,
    /// Kind of place.
    #[serde(default)]
    pub pin_type: PinType,
    /// Per-field influence weights.
    #[serde(default)]
    pub influence: InfluenceWeights,
    /// Influence radius in map space. Zero disables influence.
    #[serde(default)]
    pub influence_radius: f32,
    /// Falloff exponent; 1 is linear.
    #[serde(default = "default_falloff")]
    pub influence_falloff: f32,
    /// The player's home. At most one pin may set this.
    #[serde(default)]
    pub home_pin: bool,
    /// Asset reference for a one-off location placed at this pin.
    #[serde(default)]
    pub unique_prefab: Option<String>,
}

impl WorldPin {
    /// Creates a pin with no influence.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            name: name.into(),
            position,
            pin_type: PinType::default(),
            influence: InfluenceWeights::default(),
            influence_radius: 0.0,
            influence_falloff: default_falloff(),
            home_pin: false,
            unique_prefab: None,
        }
    }

    /// Builder: set influence weights and radius.
    #[must_use]
    pub fn with_influence(mut self, influence: InfluenceWeights, radius: f32, falloff: f32) -> Self {
        self.influence = influence;
        self.influence_radius = radius;
        self.influence_falloff = falloff;
        self
    }

    /// Builder: mark as the home pin.
    #[must_use]
    pub fn as_home(mut self) -> Self {
        self.home_pin = true;
        self
    }

    /// Whether this pin anchors a unique location.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique_prefab.is_some()
    }

    /// Signed contribution to `parameter` at `position`.
    ///
    /// Zero beyond the radius; inside it `1 - (d / r)^falloff`, scaled by the
    /// parameter's weight.
    #[must_use]
    pub fn influence_at(&self, parameter: TerrainParameter, position: Vec2) -> f32 {
        if self.influence_radius <= 0.0 {
            return 0.0;
        }
        let distance = self.position.distance(position);
        if distance > self.influence_radius {
            return 0.0;
        }
        let strength = 1.0 - (distance / self.influence_radius).powf(self.influence_falloff);
        strength * self.influence.get(parameter)
    }
}
