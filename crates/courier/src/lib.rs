//! # COURIER
//!
//! The integration crate: one generated world, the routes over it and the
//! NPCs living in it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                             COURIER                              │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────────────┐               ┌────────────────────┐     │
//! │  │ courier_procedural │               │ courier_ai         │     │
//! │  │  • Terrain fields  │               │  • Senses          │     │
//! │  │  • Region grid     │               │  • Target memory   │     │
//! │  │  • Routes          │               │  • Brain + states  │     │
//! │  └─────────┬──────────┘               └─────────┬──────────┘     │
//! │            │                                    │                │
//! │     ┌──────▼───────┐                    ┌───────▼──────┐         │
//! │     │ WorldSession │                    │ NpcScheduler │         │
//! │     └──────────────┘                    └──────────────┘         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `session`: generation pipeline and shared grid
//! - `game_loop`: frame clock and NPC scheduling

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod game_loop;
pub mod session;

pub use courier_ai as ai;
pub use courier_procedural as procedural;
pub use courier_shared as shared;

pub use error::{CourierError, CourierResult};
pub use game_loop::{FrameClock, NpcHandle, NpcScheduler, TickStats, MAX_FRAME_DELTA};
pub use session::WorldSession;
