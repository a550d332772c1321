//! # Terrain Fields
//!
//! Three independent scalar fields (temperature, altitude, moisture) at
//! `resolution × resolution`, each fractal noise blended with pin influence.
//!
//! ```text
//! field(x, y) = clamp(fbm(x, y) + 0.5 * Σ pin.influence_at(x, y), 0, 1)
//! ```

use courier_shared::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{WorldGenError, WorldGenResult};
use crate::noise::{SimplexNoise, WorldSeed};
use crate::pin::{TerrainParameter, WorldPin};

/// Range of the per-field noise offsets.
const OFFSET_RANGE: f64 = 10_000.0;

/// Weight applied to summed pin influence before blending.
const PIN_BLEND: f32 = 0.5;

/// Field values at one cell, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    /// Temperature.
    pub temperature: f32,
    /// Altitude.
    pub altitude: f32,
    /// Moisture.
    pub moisture: f32,
}

impl TerrainSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(temperature: f32, altitude: f32, moisture: f32) -> Self {
        Self { temperature, altitude, moisture }
    }

    /// Value of one parameter.
    #[must_use]
    pub const fn get(&self, parameter: TerrainParameter) -> f32 {
        match parameter {
            TerrainParameter::Temperature => self.temperature,
            TerrainParameter::Altitude => self.altitude,
            TerrainParameter::Moisture => self.moisture,
        }
    }
}

/// Noise settings for one generation pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainSettings {
    /// Cells per side.
    pub resolution: usize,
    /// Map-to-noise scale; larger means busier terrain.
    pub noise_scale: f64,
    /// World seed.
    pub seed: WorldSeed,
    /// Fractal octaves.
    pub octaves: u32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            resolution: 256,
            noise_scale: 4.0,
            seed: WorldSeed::default(),
            octaves: 4,
        }
    }
}

/// Dense terrain fields produced by [`TerrainMapGenerator`].
///
/// Read-only once generated.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainData {
    resolution: usize,
    temperature: Vec<f32>,
    altitude: Vec<f32>,
    moisture: Vec<f32>,
}

impl TerrainData {
    /// Builds terrain from precomputed row-major fields.
    ///
    /// # Errors
    ///
    /// Fails if any field's length is not `resolution²`.
    pub fn from_fields(
        resolution: usize,
        temperature: Vec<f32>,
        altitude: Vec<f32>,
        moisture: Vec<f32>,
    ) -> WorldGenResult<Self> {
        let expected = resolution * resolution;
        if resolution == 0
            || temperature.len() != expected
            || altitude.len() != expected
            || moisture.len() != expected
        {
            return Err(WorldGenError::InvalidConfig(format!(
                "terrain fields must each hold {expected} values"
            )));
        }
        Ok(Self { resolution, temperature, altitude, moisture })
    }

    /// Cells per side.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Row-major field for one parameter.
    #[must_use]
    pub fn field(&self, parameter: TerrainParameter) -> &[f32] {
        match parameter {
            TerrainParameter::Temperature => &self.temperature,
            TerrainParameter::Altitude => &self.altitude,
            TerrainParameter::Moisture => &self.moisture,
        }
    }

    /// Value of one parameter at a cell, `None` out of bounds.
    #[must_use]
    pub fn value_at(&self, parameter: TerrainParameter, x: usize, y: usize) -> Option<f32> {
        if x >= self.resolution || y >= self.resolution {
            return None;
        }
        self.field(parameter).get(y * self.resolution + x).copied()
    }

    /// All three values at a cell. Coordinates are clamped into range.
    #[must_use]
    pub fn sample_cell(&self, x: usize, y: usize) -> TerrainSample {
        let x = x.min(self.resolution - 1);
        let y = y.min(self.resolution - 1);
        let index = y * self.resolution + x;
        TerrainSample::new(self.temperature[index], self.altitude[index], self.moisture[index])
    }

    /// Nearest-cell sample at normalized `(u, v)`. Inputs are clamped to `[0, 1]`.
    #[must_use]
    pub fn sample(&self, u: f32, v: f32) -> TerrainSample {
        let to_cell = |t: f32| ((t.clamp(0.0, 1.0) * self.resolution as f32) as usize).min(self.resolution - 1);
        self.sample_cell(to_cell(u), to_cell(v))
    }
}

/// Deterministic generator for the three terrain fields.
pub struct TerrainMapGenerator {
    settings: TerrainSettings,
}

impl TerrainMapGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new(settings: TerrainSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// Generates all three fields with `pins` blended in.
    ///
    /// # Errors
    ///
    /// Fails on zero resolution or a non-positive noise scale.
    pub fn generate(&self, pins: &[WorldPin]) -> WorldGenResult<TerrainData> {
        let TerrainSettings { resolution, noise_scale, .. } = self.settings;
        if resolution == 0 {
            return Err(WorldGenError::InvalidConfig("terrain resolution must be positive".into()));
        }
        if noise_scale.partial_cmp(&0.0) != Some(std::cmp::Ordering::Greater) {
            return Err(WorldGenError::InvalidConfig("noise scale must be positive".into()));
        }

        let temperature = self.generate_field(TerrainParameter::Temperature, pins);
        let altitude = self.generate_field(TerrainParameter::Altitude, pins);
        let moisture = self.generate_field(TerrainParameter::Moisture, pins);

        tracing::debug!(
            "Generated terrain fields at {}x{} ({} octaves, {} pins)",
            resolution,
            resolution,
            self.settings.octaves,
            pins.len()
        );

        TerrainData::from_fields(resolution, temperature, altitude, moisture)
    }

    /// Per-field noise offset derived from the seed.
    ///
    /// Keeps the fields decorrelated even though they share scale and octaves.
    #[must_use]
    pub fn field_offset(&self, parameter: TerrainParameter) -> (f64, f64) {
        let mut rng = self.settings.seed.derive(parameter.seed_purpose()).rng();
        (
            rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE),
            rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE),
        )
    }

    fn generate_field(&self, parameter: TerrainParameter, pins: &[WorldPin]) -> Vec<f32> {
        let TerrainSettings { resolution, noise_scale, seed, octaves } = self.settings;
        let noise = SimplexNoise::new(seed);
        let (offset_x, offset_y) = self.field_offset(parameter);
        let inv = 1.0 / resolution as f64;

        let mut field = Vec::with_capacity(resolution * resolution);
        for y in 0..resolution {
            for x in 0..resolution {
                let nx = x as f64 * inv * noise_scale + offset_x;
                let ny = y as f64 * inv * noise_scale + offset_y;
                let base = noise.fractal(nx, ny, octaves) as f32;

                let cell = Vec2::new((x as f32 + 0.5) / resolution as f32, (y as f32 + 0.5) / resolution as f32);
                let influence: f32 = pins.iter().map(|pin| pin.influence_at(parameter, cell)).sum();

                field.push((base + influence * PIN_BLEND).clamp(0.0, 1.0));
            }
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::InfluenceWeights;

    fn settings(seed: u64) -> TerrainSettings {
        TerrainSettings { resolution: 32, noise_scale: 3.0, seed: WorldSeed::new(seed), octaves: 4 }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let pins = vec![WorldPin::new("Peak", Vec2::new(0.3, 0.7)).with_influence(
            InfluenceWeights { altitude: 1.0, ..InfluenceWeights::default() },
            0.25,
            2.0,
        )];
        let a = TerrainMapGenerator::new(settings(7)).generate(&pins).unwrap();
        let b = TerrainMapGenerator::new(settings(7)).generate(&pins).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fields_are_decorrelated() {
        let data = TerrainMapGenerator::new(settings(11)).generate(&[]).unwrap();
        assert_ne!(data.field(TerrainParameter::Temperature), data.field(TerrainParameter::Altitude));
        assert_ne!(data.field(TerrainParameter::Altitude), data.field(TerrainParameter::Moisture));
    }

    #[test]
    fn test_values_in_unit_range() {
        let pins = vec![WorldPin::new("Sink", Vec2::new(0.5, 0.5)).with_influence(
            InfluenceWeights { temperature: -1.0, altitude: 1.0, moisture: 1.0 },
            0.6,
            1.0,
        )];
        let data = TerrainMapGenerator::new(settings(3)).generate(&pins).unwrap();
        for parameter in TerrainParameter::ALL {
            assert!(data.field(parameter).iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_pin_raises_altitude() {
        let plain = TerrainMapGenerator::new(settings(5)).generate(&[]).unwrap();
        let pins = vec![WorldPin::new("Peak", Vec2::new(0.5, 0.5)).with_influence(
            InfluenceWeights { altitude: 1.0, ..InfluenceWeights::default() },
            0.3,
            1.0,
        )];
        let raised = TerrainMapGenerator::new(settings(5)).generate(&pins).unwrap();

        let before = plain.sample(0.5, 0.5).altitude;
        let after = raised.sample(0.5, 0.5).altitude;
        assert!(after >= before);
        assert!(after > before || before == 1.0);
        // Far corner untouched
        assert_eq!(plain.sample(0.0, 0.0), raised.sample(0.0, 0.0));
    }

    #[test]
    fn test_sampling_clamps_and_bounds() {
        let data = TerrainMapGenerator::new(settings(1)).generate(&[]).unwrap();
        assert_eq!(data.sample(1.0, 1.0), data.sample_cell(31, 31));
        assert_eq!(data.sample(-3.0, 0.0), data.sample_cell(0, 0));
        assert!(data.value_at(TerrainParameter::Moisture, 32, 0).is_none());
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let bad = TerrainSettings { resolution: 0, ..TerrainSettings::default() };
        assert!(TerrainMapGenerator::new(bad).generate(&[]).is_err());
    }
}
