//! # COURIER AI
//!
//! Per-NPC perception, threat-ranked targeting and priority-ordered
//! behaviour states.
//!
//! ## Design Principles
//!
//! 1. **Host-agnostic**: physics, navigation and entities arrive through
//!    [`WorldQuery`] and [`Navigator`]
//! 2. **One owner**: a brain is mutated only by its own NPC's tick
//! 3. **Throttled perception**: sight runs every
//!    [`PERCEPTION_INTERVAL`](courier_shared::PERCEPTION_INTERVAL) frames
//!
//! ## Tick
//!
//! ```text
//! perceive ─> TargetList ─> current target
//!                                │
//! cooldowns ─> first eligible state (priority order) ─> cleanup/initialize ─> update
//!                                                                               │
//!                                                                    EventSender ┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use courier_ai::{AiBrain, NpcArchetypes};
//!
//! let archetypes = NpcArchetypes::from_file("data/npcs.toml")?;
//! let wolf = Arc::new(archetypes.get("wolf")?.clone());
//! let mut brain = AiBrain::new(npc, wolf, navigator, 42)?;
//! brain.update(&world, frame_time);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod brain;
pub mod config;
pub mod error;
pub mod events;
pub mod random;
pub mod senses;
pub(crate) mod states;
pub mod target;
pub mod world;

pub use brain::{AiBrain, NoiseAlert};
pub use config::{AiStateType, BeamConfig, NpcArchetypes, NpcConfig};
pub use error::{AiError, AiResult};
pub use events::{AiEvent, EventBus, EventReceiver, EventSender};
pub use states::{COMBAT_REACH, FOLLOW_ARRIVAL_DISTANCE, FOLLOW_LEAD};
pub use target::{Target, TargetChanges, TargetList};
pub use world::{Navigator, RaycastHit, WorldQuery};
