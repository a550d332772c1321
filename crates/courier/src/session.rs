//! # World Session
//!
//! Runs the generation pipeline once and shares the result.
//!
//! ```text
//! WorldGenConfig ─> TerrainData ─> Arc<RegionGrid> ─┬─> RoutePlanner
//!                                                   ├─> RoutePlanner
//!                                                   └─> ...
//! ```
//!
//! The grid never changes after generation, so planners on other threads
//! read it without locks.

use std::sync::Arc;

use courier_procedural::{
    GridCoord, RegionGrid, RoutePlanner, TerrainData, TerrainMapGenerator, WorldChunkGenerator,
    WorldGenConfig,
};

use crate::error::{CourierError, CourierResult};

/// A generated world.
pub struct WorldSession {
    config: WorldGenConfig,
    terrain: TerrainData,
    grid: Arc<RegionGrid>,
    planners_issued: u64,
}

impl WorldSession {
    /// Validates `config` and generates terrain and regions.
    ///
    /// # Errors
    ///
    /// Any validation or generation error.
    pub fn generate(config: WorldGenConfig) -> CourierResult<Self> {
        config.validate()?;

        let terrain = TerrainMapGenerator::new(config.terrain_settings()).generate(&config.pins)?;
        let grid = WorldChunkGenerator::new(config.chunk_settings(), config.region_definitions())
            .generate(&terrain, &config.pins)?;

        tracing::info!(
            "World session ready: seed {}, {} regions per side, home {}",
            config.seed.value(),
            grid.size(),
            grid.home_region().map_or_else(|| "none".to_string(), |region| region.coord.to_string())
        );

        Ok(Self { config, terrain, grid: Arc::new(grid), planners_issued: 0 })
    }

    /// The config the world was built from.
    #[must_use]
    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    /// Raw terrain fields.
    #[must_use]
    pub fn terrain(&self) -> &TerrainData {
        &self.terrain
    }

    /// The region grid.
    #[must_use]
    pub fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// A shared handle to the region grid.
    #[must_use]
    pub fn shared_grid(&self) -> Arc<RegionGrid> {
        Arc::clone(&self.grid)
    }

    /// Grid cell of the home pin.
    ///
    /// # Errors
    ///
    /// `NoHomeRegion` if no pin is flagged home.
    pub fn home(&self) -> CourierResult<GridCoord> {
        self.grid.home_region().map(|region| region.coord).ok_or(CourierError::NoHomeRegion)
    }

    /// A planner over this world.
    ///
    /// Each call derives a fresh stream from the world seed: the n-th planner
    /// of a session always behaves the same.
    pub fn planner(&mut self) -> RoutePlanner {
        let seed = self.config.seed.derive(self.planners_issued);
        self.planners_issued += 1;
        RoutePlanner::new(self.shared_grid(), seed)
    }
}
