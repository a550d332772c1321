//! # Host Collaborators
//!
//! The AI core never touches physics, navigation or entity storage itself.
//! The host implements these traits and passes them in.
//!
//! - [`WorldQuery`]: read-only spatial queries and entity poses, shared by
//!   every brain in a tick
//! - [`Navigator`]: one per NPC, owned by its brain; requests are
//!   fire-and-forget and movement happens on the host's side

use courier_shared::{EntityId, Vec3};

/// One hit from a ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// Entity owning the hit collider.
    pub entity: EntityId,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Read-only view of the host world.
///
/// Implementations must be safe to read from several brains at once.
pub trait WorldQuery {
    /// Entities with a collider inside the sphere on any of `layer_mask`'s layers.
    fn overlap_sphere(&self, center: Vec3, radius: f32, layer_mask: u32) -> Vec<EntityId>;

    /// Every hit along the ray, in no particular order.
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RaycastHit>;

    /// World position, `None` if the entity is gone.
    fn position(&self, entity: EntityId) -> Option<Vec3>;

    /// Facing direction, `None` if the entity is gone.
    fn forward(&self, entity: EntityId) -> Option<Vec3>;

    /// Identity tag such as `"Player"`.
    fn tag(&self, entity: EntityId) -> Option<&str>;

    /// Whether the entity still exists.
    fn is_alive(&self, entity: EntityId) -> bool;
}

/// Per-NPC movement oracle.
pub trait Navigator {
    /// Requests a path to `position`.
    fn set_destination(&mut self, position: Vec3);

    /// Halts or resumes movement along the current path.
    fn set_stopped(&mut self, stopped: bool);

    /// Whether movement is halted.
    fn is_stopped(&self) -> bool;

    /// Path distance left to the current goal.
    fn remaining_distance(&self) -> f32;

    /// Turns the agent to face `direction`.
    fn face_towards(&mut self, direction: Vec3);

    /// Applies movement tuning.
    fn configure(&mut self, speed: f32, angular_speed: f32, stopping_distance: f32);
}

#[cfg(test)]
#[path = "../tests/common/world.rs"]
pub(crate) mod testing;
