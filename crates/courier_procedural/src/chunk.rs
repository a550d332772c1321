//! # World Chunk Generation
//!
//! Partitions terrain fields into an `N × N` region grid:
//!
//! 1. Average the three fields over evenly spaced sub-samples per cell
//! 2. Classify the mean sample into a [`RegionType`]
//! 3. Pick a matching [`RegionDefinition`] uniformly at random
//! 4. Attach each pin to the cell at `floor(pin.position * N)`

use std::collections::BTreeMap;

use courier_shared::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{WorldGenError, WorldGenResult};
use crate::grid::{GridCoord, Region, RegionBounds, RegionGrid};
use crate::noise::WorldSeed;
use crate::pin::WorldPin;
use crate::region::{RegionDefinition, RegionType};
use crate::terrain::{TerrainData, TerrainSample};

/// Seed purpose for region-definition choice.
const DEFINITION_PURPOSE: u64 = 0xDEF1;

/// Settings for [`WorldChunkGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkSettings {
    /// Regions per side (`N`).
    pub world_size_in_regions: usize,
    /// World-space edge length of one region.
    pub region_world_size: f32,
    /// Sub-samples per axis inside each region.
    pub subsamples_per_axis: usize,
    /// Seed for definition choice.
    pub seed: WorldSeed,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            world_size_in_regions: 16,
            region_world_size: 500.0,
            subsamples_per_axis: 4,
            seed: WorldSeed::default(),
        }
    }
}

/// Builds a [`RegionGrid`] from terrain fields.
pub struct WorldChunkGenerator {
    settings: ChunkSettings,
    definitions: Vec<RegionDefinition>,
}

impl WorldChunkGenerator {
    /// Creates a generator choosing among `definitions`.
    #[must_use]
    pub fn new(settings: ChunkSettings, definitions: Vec<RegionDefinition>) -> Self {
        Self { settings, definitions }
    }

    /// Generates the grid.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for a zero-sized world
    /// - `MultipleHomePins` if more than one pin is flagged home
    /// - `NoRegionDefinition` if a classified type has no definition
    pub fn generate(&self, terrain: &TerrainData, pins: &[WorldPin]) -> WorldGenResult<RegionGrid> {
        let n = self.settings.world_size_in_regions;
        if n == 0 {
            return Err(WorldGenError::InvalidConfig("world_size_in_regions must be positive".into()));
        }
        check_single_home(pins)?;

        let samples_per_axis = self.samples_per_axis(terrain.resolution());
        let mut rng = self.settings.seed.derive(DEFINITION_PURPOSE).rng();
        let mut regions = Vec::with_capacity(n * n);

        for gy in 0..n {
            for gx in 0..n {
                let coord = GridCoord::new(gx as i32, gy as i32);
                let sample = self.average_sample(terrain, gx, gy, samples_per_axis);
                let region_type = RegionType::classify(&sample);
                let definition = self.choose_definition(region_type, &sample, &mut rng)?;

                regions.push(Region {
                    coord,
                    bounds: self.bounds(coord),
                    sample,
                    region_type,
                    definition,
                    pin: None,
                });
            }
        }

        self.attach_pins(&mut regions, pins);

        let grid = RegionGrid::from_regions(n, regions)?;
        log_summary(&grid);
        Ok(grid)
    }

    /// Sub-samples per axis for a terrain of this resolution; at least 1.
    fn samples_per_axis(&self, resolution: usize) -> usize {
        let cell = resolution / self.settings.world_size_in_regions;
        let wanted = self.settings.subsamples_per_axis.max(1);
        if cell / wanted == 0 {
            1
        } else {
            wanted
        }
    }

    fn average_sample(&self, terrain: &TerrainData, gx: usize, gy: usize, per_axis: usize) -> TerrainSample {
        let n = self.settings.world_size_in_regions as f32;
        let mut sum = TerrainSample::default();

        for sy in 0..per_axis {
            for sx in 0..per_axis {
                let u = (gx as f32 + (sx as f32 + 0.5) / per_axis as f32) / n;
                let v = (gy as f32 + (sy as f32 + 0.5) / per_axis as f32) / n;
                let s = terrain.sample(u, v);
                sum.temperature += s.temperature;
                sum.altitude += s.altitude;
                sum.moisture += s.moisture;
            }
        }

        let count = (per_axis * per_axis) as f32;
        TerrainSample::new(sum.temperature / count, sum.altitude / count, sum.moisture / count)
    }

    /// Prefers definitions whose ranges accept the sample; falls back to any
    /// definition of the type.
    fn choose_definition(
        &self,
        region_type: RegionType,
        sample: &TerrainSample,
        rng: &mut impl Rng,
    ) -> WorldGenResult<RegionDefinition> {
        let of_type: Vec<&RegionDefinition> =
            self.definitions.iter().filter(|d| d.region_type == region_type).collect();
        let accepting: Vec<&RegionDefinition> = of_type.iter().copied().filter(|d| d.accepts(sample)).collect();

        let pool = if accepting.is_empty() { &of_type } else { &accepting };
        pool.choose(rng)
            .map(|definition| (*definition).clone())
            .ok_or(WorldGenError::NoRegionDefinition(region_type))
    }

    fn bounds(&self, coord: GridCoord) -> RegionBounds {
        let size = self.settings.region_world_size;
        let min = coord.as_vec2() * size;
        RegionBounds { min, max: min + Vec2::new(size, size) }
    }

    fn attach_pins(&self, regions: &mut [Region], pins: &[WorldPin]) {
        let n = self.settings.world_size_in_regions;
        for pin in pins {
            let coord = pin_cell(pin, n);
            let Some(region) = regions.get_mut(coord.y as usize * n + coord.x as usize) else {
                continue;
            };
            match &region.pin {
                Some(existing) => tracing::warn!(
                    "Pin '{}' lands in region {} already holding '{}'; keeping '{}'",
                    pin.name,
                    coord,
                    existing.name,
                    existing.name
                ),
                None => {
                    tracing::debug!("Pin '{}' attached to region {}", pin.name, coord);
                    region.pin = Some(pin.clone());
                }
            }
        }
    }
}

/// Grid cell for a pin: `floor(position * N)`, clamped so `1.0` maps to the last cell.
#[must_use]
pub fn pin_cell(pin: &WorldPin, world_size_in_regions: usize) -> GridCoord {
    let max = world_size_in_regions as i32 - 1;
    let cell = |t: f32| ((t * world_size_in_regions as f32).floor() as i32).clamp(0, max);
    GridCoord::new(cell(pin.position.x), cell(pin.position.y))
}

/// At most one pin may be flagged home.
///
/// # Errors
///
/// `MultipleHomePins` naming the first two offenders.
pub fn check_single_home(pins: &[WorldPin]) -> WorldGenResult<()> {
    let mut homes = pins.iter().filter(|pin| pin.home_pin);
    if let (Some(first), Some(second)) = (homes.next(), homes.next()) {
        return Err(WorldGenError::MultipleHomePins {
            first: first.name.clone(),
            second: second.name.clone(),
        });
    }
    Ok(())
}

fn log_summary(grid: &RegionGrid) {
    let mut histogram: BTreeMap<RegionType, usize> = BTreeMap::new();
    for region in grid.all_regions() {
        *histogram.entry(region.region_type).or_default() += 1;
    }
    tracing::info!(
        "Generated {}x{} region grid: {:?}",
        grid.size(),
        grid.size(),
        histogram
    );
}
