//! # Simulation Constants
//!
//! Values shared by every crate that ticks the world.

/// Tick rate (updates per second) assumed by default configs.
pub const TICK_RATE: u32 = 60;

/// Perception runs on every Nth frame.
pub const PERCEPTION_INTERVAL: u64 = 10;

/// Default frame delta in seconds at [`TICK_RATE`].
pub const DEFAULT_DELTA: f32 = 1.0 / TICK_RATE as f32;
