//! # Senses
//!
//! Perception primitives: sight cone, line of sight, distance and hearing.
//!
//! Sight is two-stage. [`look_for_targets`] is generous: any
//! ray hit toward a candidate counts as evidence it is in range.
//! [`is_target_in_los`] is strict: the closest hit must be the player, so
//! any geometry in between blocks it.

use courier_shared::{EntityId, Vec3};

use crate::config::NpcConfig;
use crate::world::{RaycastHit, WorldQuery};

/// Whether `direction` lies within `max_fov` degrees of `forward`.
#[must_use]
pub fn in_field_of_view(forward: Vec3, direction: Vec3, max_fov: f32) -> bool {
    forward.angle_degrees(direction) <= max_fov
}

/// Candidates the NPC can see this tick.
///
/// Entities within vision range and inside the view cone, with at least one
/// ray hit toward them. The NPC itself is never a candidate.
pub fn look_for_targets<W: WorldQuery + ?Sized>(world: &W, npc: EntityId, config: &NpcConfig) -> Vec<EntityId> {
    let (Some(position), Some(forward)) = (world.position(npc), world.forward(npc)) else {
        return Vec::new();
    };
    let vision = config.base_vision_distance;

    world
        .overlap_sphere(position, vision, config.layer_mask)
        .into_iter()
        .filter(|&candidate| candidate != npc)
        .filter(|&candidate| {
            let Some(target) = world.position(candidate) else {
                return false;
            };
            let direction = target - position;
            in_field_of_view(forward, direction, config.max_fov)
                && world.raycast_all(position, direction, vision).iter().any(|hit| hit.entity != npc)
        })
        .collect()
}

/// Strict line of sight: `target` inside the cone and the closest ray hit
/// toward it tagged as the player.
pub fn is_target_in_los<W: WorldQuery + ?Sized>(world: &W, npc: EntityId, target: EntityId, config: &NpcConfig) -> bool {
    let (Some(position), Some(forward), Some(target_position)) =
        (world.position(npc), world.forward(npc), world.position(target))
    else {
        return false;
    };
    let direction = target_position - position;
    if !in_field_of_view(forward, direction, config.max_fov) {
        return false;
    }

    let mut hits: Vec<RaycastHit> = world
        .raycast_all(position, direction, config.base_vision_distance)
        .into_iter()
        .filter(|hit| hit.entity != npc)
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    hits.first()
        .and_then(|closest| world.tag(closest.entity))
        .is_some_and(|tag| tag == config.player_tag)
}

/// Euclidean distance between two live entities.
pub fn distance_from_target<W: WorldQuery + ?Sized>(world: &W, from: EntityId, to: EntityId) -> Option<f32> {
    Some(world.position(from)?.distance(world.position(to)?))
}

/// Whether `to` is within `range` of `from`.
pub fn is_target_in_range<W: WorldQuery + ?Sized>(world: &W, from: EntityId, to: EntityId, range: f32) -> bool {
    distance_from_target(world, from, to).is_some_and(|distance| distance <= range)
}

/// Perceived volume in dB at `distance` from a source of `volume` dB
/// measured at `reference_distance`.
///
/// ```text
/// perceived = volume - 20 * log10(distance / reference_distance)
/// ```
#[must_use]
pub fn sound_attenuation(volume: f32, distance: f32, reference_distance: f32) -> f32 {
    let distance = distance.max(f32::EPSILON);
    volume - 20.0 * (distance / reference_distance).log10()
}
