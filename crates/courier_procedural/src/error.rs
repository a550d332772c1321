//! # World Generation Error Types
//!
//! Configuration errors are fatal for the call that hit them. Invalid input
//! to the route planner is recoverable: the call fails and state is untouched.

use thiserror::Error;

use crate::region::RegionType;
use crate::route::Direction;

/// Errors raised while loading config or generating a world.
#[derive(Error, Debug)]
pub enum WorldGenError {
    /// A region classified as this type has no definition to choose from.
    #[error("no region definition configured for region type {0:?}")]
    NoRegionDefinition(RegionType),

    /// More than one pin is flagged as the home pin.
    #[error("multiple home pins: '{first}' and '{second}'")]
    MultipleHomePins {
        /// First home pin found.
        first: String,
        /// Second home pin found.
        second: String,
    },

    /// A value in the config is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The TOML could not be parsed.
    #[error("failed to parse world config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config file could not be read.
    #[error("failed to read world config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for world generation.
pub type WorldGenResult<T> = Result<T, WorldGenError>;

/// Errors raised by route generation and traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Coordinates fall outside the region grid.
    #[error("coordinates ({x}, {y}) are outside the region grid")]
    OutOfBounds {
        /// Grid X.
        x: i32,
        /// Grid Y.
        y: i32,
    },

    /// The grid has no region at otherwise valid coordinates.
    #[error("no region at ({x}, {y})")]
    MissingRegion {
        /// Grid X.
        x: i32,
        /// Grid Y.
        y: i32,
    },

    /// No route is being followed.
    #[error("no active route")]
    NoActiveRoute,

    /// The current node has no exit in that direction.
    #[error("no exit to the {0}")]
    NoExit(Direction),

    /// The direction has exits, but not that many.
    #[error("exit {index} to the {direction} does not exist ({available} available)")]
    ExitIndexOutOfRange {
        /// Requested direction.
        direction: Direction,
        /// Requested index.
        index: usize,
        /// Number of exits in that direction.
        available: usize,
    },
}

/// Result type for routing.
pub type RouteResult<T> = Result<T, RouteError>;
