//! # COURIER Shared
//!
//! Common types used by the world generation and AI crates.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on an engine, a renderer or a physics
//! backend. Everything here is plain data.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod entity;
pub mod math;
pub mod time;

pub use constants::{DEFAULT_DELTA, PERCEPTION_INTERVAL, TICK_RATE};
pub use entity::EntityId;
pub use math::{Vec2, Vec3};
pub use time::FrameTime;
