//! Error types for the integration layer.

use courier_ai::AiError;
use courier_procedural::{RouteError, WorldGenError};
use thiserror::Error;

use crate::game_loop::NpcHandle;

/// Errors surfaced by sessions and the scheduler.
#[derive(Debug, Error)]
pub enum CourierError {
    /// World generation or config loading failed.
    #[error("world generation failed: {0}")]
    WorldGen(#[from] WorldGenError),

    /// Route planning failed.
    #[error("route planning failed: {0}")]
    Route(#[from] RouteError),

    /// Brain construction or archetype loading failed.
    #[error("AI setup failed: {0}")]
    Ai(#[from] AiError),

    /// The world has no home region to start from.
    #[error("world has no home region")]
    NoHomeRegion,

    /// The handle is not registered.
    #[error("unknown NPC handle {0:?}")]
    UnknownNpc(NpcHandle),
}

/// Result type for integration operations.
pub type CourierResult<T> = Result<T, CourierError>;
