//! # AI Error Types
//!
//! Only configuration can fail. Runtime surprises such as a target
//! vanishing mid-tick are handled as "target lost", never as errors.

use thiserror::Error;

/// Errors raised while loading or validating NPC archetypes.
#[derive(Error, Debug)]
pub enum AiError {
    /// The archetype enables no behaviour states.
    #[error("archetype '{0}' has no AI states configured")]
    NoStatesConfigured(String),

    /// A tuning value is out of range.
    #[error("invalid NPC configuration: {0}")]
    InvalidConfig(String),

    /// The TOML could not be parsed.
    #[error("failed to parse NPC archetypes: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The archetype file could not be read.
    #[error("failed to read NPC archetypes: {0}")]
    Io(#[from] std::io::Error),

    /// No archetype with that name.
    #[error("unknown NPC archetype '{0}'")]
    UnknownArchetype(String),
}

/// Result type for AI configuration.
pub type AiResult<T> = Result<T, AiError>;
