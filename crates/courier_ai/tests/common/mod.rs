//! Shared host doubles for the AI integration tests.

use courier_ai::{Navigator, RaycastHit, WorldQuery};
use courier_shared::{EntityId, Vec3};

mod world;

pub use world::{Arena, NavCall, RecordingNavigator};
