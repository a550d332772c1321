//! # Region Grid
//!
//! The addressable `size × size` map of classified regions. Built once by
//! [`crate::WorldChunkGenerator`] and read-only afterwards, so it can be
//! shared (`Arc<RegionGrid>`) between any number of route planners.

use courier_shared::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{WorldGenError, WorldGenResult};
use crate::pin::WorldPin;
use crate::region::{RegionDefinition, RegionType};
use crate::terrain::TerrainSample;

/// Integer grid coordinates of a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridCoord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in grid units.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }

    /// As a float vector.
    #[must_use]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// World-space rectangle covered by a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    /// Minimum corner.
    pub min: Vec2,
    /// Maximum corner.
    pub max: Vec2,
}

/// One cell of the world grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Grid coordinates.
    pub coord: GridCoord,
    /// World-space bounds.
    pub bounds: RegionBounds,
    /// Mean of the terrain sub-samples inside the bounds.
    pub sample: TerrainSample,
    /// Classified biome.
    pub region_type: RegionType,
    /// Chosen definition for the biome.
    pub definition: RegionDefinition,
    /// Pin whose position falls in this cell, if any.
    pub pin: Option<WorldPin>,
}

impl Region {
    /// Name shown to players: the pin name when pinned, else the definition
    /// name with coordinates.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.pin {
            Some(pin) => pin.name.clone(),
            None => format!("{} {}", self.definition.name, self.coord),
        }
    }

    /// Whether this region holds the home pin.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.pin.as_ref().is_some_and(|pin| pin.home_pin)
    }
}

/// Dense `size × size` region map.
///
/// Out-of-bounds lookups return `None`, never panic.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionGrid {
    size: usize,
    regions: Vec<Region>,
}

impl RegionGrid {
    /// Builds a grid from row-major regions.
    ///
    /// # Errors
    ///
    /// Fails if `regions.len() != size²` or a region's coordinates disagree
    /// with its slot.
    pub fn from_regions(size: usize, regions: Vec<Region>) -> WorldGenResult<Self> {
        if size == 0 || regions.len() != size * size {
            return Err(WorldGenError::InvalidConfig(format!(
                "region grid of size {size} needs {} regions, got {}",
                size * size,
                regions.len()
            )));
        }
        for (index, region) in regions.iter().enumerate() {
            let expected = GridCoord::new((index % size) as i32, (index / size) as i32);
            if region.coord != expected {
                return Err(WorldGenError::InvalidConfig(format!(
                    "region at slot {expected} claims coordinates {}",
                    region.coord
                )));
            }
        }
        Ok(Self { size, regions })
    }

    /// Regions per side.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether `(x, y)` lies inside the grid.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    /// Region at `(x, y)`, `None` out of bounds.
    #[must_use]
    pub fn get_region(&self, x: i32, y: i32) -> Option<&Region> {
        if !self.contains(x, y) {
            return None;
        }
        self.regions.get(y as usize * self.size + x as usize)
    }

    /// Region at a coordinate.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<&Region> {
        self.get_region(coord.x, coord.y)
    }

    /// Every region, row-major.
    #[must_use]
    pub fn all_regions(&self) -> &[Region] {
        &self.regions
    }

    /// The region holding the home pin.
    ///
    /// Config validation guarantees at most one home pin, so the first match
    /// is the only match.
    #[must_use]
    pub fn home_region(&self) -> Option<&Region> {
        self.regions.iter().find(|region| region.is_home())
    }

    /// All regions of one type.
    pub fn regions_of_type(&self, region_type: RegionType) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |region| region.region_type == region_type)
    }

    /// Clamps a coordinate into the grid.
    #[must_use]
    pub fn clamp(&self, coord: GridCoord) -> GridCoord {
        let max = self.size as i32 - 1;
        GridCoord::new(coord.x.clamp(0, max), coord.y.clamp(0, max))
    }

    /// Renders one glyph per region, one row per line, row 0 first.
    #[must_use]
    pub fn ascii_map(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in self.regions.chunks(self.size) {
            for region in row {
                out.push(if region.pin.is_some() { '@' } else { region.region_type.glyph() });
            }
            out.push('\n');
        }
        out
    }
}
