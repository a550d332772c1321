//! # COURIER Procedural Generation
//!
//! Deterministic world generation and route planning.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and config always produce the same world
//! 2. **Immutable output**: Grids and route graphs never change once built
//! 3. **Shareable**: One `Arc<RegionGrid>` serves any number of planners
//!
//! ## Pipeline
//!
//! ```text
//! WorldPins ─┐
//!            ├─> TerrainMapGenerator ─> TerrainData ─> WorldChunkGenerator ─> RegionGrid
//! Settings ──┘                                                                    │
//!                                     RoutePlanner <─ RouteGraph <─ RouteGenerator ┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_procedural::{TerrainMapGenerator, WorldChunkGenerator, WorldGenConfig};
//!
//! let config = WorldGenConfig::default();
//! let terrain = TerrainMapGenerator::new(config.terrain_settings()).generate(&config.pins)?;
//! let grid = WorldChunkGenerator::new(config.chunk_settings(), config.region_definitions())
//!     .generate(&terrain, &config.pins)?;
//! assert!(grid.get_region(0, 0).is_some());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod chunk;
pub mod config;
pub mod error;
pub mod grid;
pub mod noise;
pub mod pin;
pub mod region;
pub mod route;
pub mod terrain;

pub use chunk::{ChunkSettings, WorldChunkGenerator};
pub use config::WorldGenConfig;
pub use error::{RouteError, RouteResult, WorldGenError, WorldGenResult};
pub use grid::{GridCoord, Region, RegionBounds, RegionGrid};
pub use noise::{SimplexNoise, WorldSeed};
pub use pin::{InfluenceWeights, PinType, TerrainParameter, WorldPin};
pub use region::{ParameterRange, RegionDefinition, RegionType};
pub use route::{
    Direction, NodeId, NodeType, RouteConnection, RouteExit, RouteGenerator, RouteGraph, RouteNode, RoutePlanner,
    RoutePreferences, RouteStatus,
};
pub use terrain::{TerrainData, TerrainMapGenerator, TerrainSample, TerrainSettings};
