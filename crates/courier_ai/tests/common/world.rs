//! Sphere-world and navigator doubles.
//!
//! Compiled twice: into the unit tests as `world::testing`, and into the
//! integration tests through `common`. The including module brings
//! `EntityId`, `Vec3`, `Navigator`, `RaycastHit` and `WorldQuery` into scope.

#![allow(dead_code)]

use std::collections::BTreeMap;

use super::{EntityId, Navigator, RaycastHit, Vec3, WorldQuery};

/// A sphere-shaped entity.
pub struct Body {
    pub position: Vec3,
    pub forward: Vec3,
    pub tag: String,
    pub radius: f32,
    pub alive: bool,
}

/// Entities as spheres. Rays hit every sphere they pass through, except one
/// containing the ray origin.
#[derive(Default)]
pub struct Arena {
    bodies: BTreeMap<EntityId, Body>,
}

impl Arena {
    pub fn spawn(&mut self, index: u32, tag: &str, position: Vec3) -> EntityId {
        let id = EntityId::new(index, 0);
        self.bodies.insert(id, Body { position, forward: Vec3::Z, tag: tag.to_string(), radius: 0.5, alive: true });
        id
    }

    pub fn kill(&mut self, id: EntityId) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.alive = false;
        }
    }

    pub fn move_to(&mut self, id: EntityId, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.position = position;
        }
    }

    pub fn face(&mut self, id: EntityId, forward: Vec3) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.forward = forward;
        }
    }

    fn live(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id).filter(|body| body.alive)
    }
}

impl WorldQuery for Arena {
    fn overlap_sphere(&self, center: Vec3, radius: f32, _layer_mask: u32) -> Vec<EntityId> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.alive && body.position.distance(center) <= radius + body.radius)
            .map(|(id, _)| *id)
            .collect()
    }

    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RaycastHit> {
        let dir = direction.normalized();
        self.bodies
            .iter()
            .filter(|(_, body)| body.alive && origin.distance(body.position) >= body.radius)
            .filter_map(|(id, body)| {
                let along = (body.position - origin).dot(dir);
                if !(0.0..=max_distance).contains(&along) {
                    return None;
                }
                let point = origin + dir * along;
                (point.distance(body.position) <= body.radius).then_some(RaycastHit {
                    entity: *id,
                    distance: along,
                    point,
                })
            })
            .collect()
    }

    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.live(entity).map(|body| body.position)
    }

    fn forward(&self, entity: EntityId) -> Option<Vec3> {
        self.live(entity).map(|body| body.forward)
    }

    fn tag(&self, entity: EntityId) -> Option<&str> {
        self.live(entity).map(|body| body.tag.as_str())
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.live(entity).is_some()
    }
}

/// One navigator request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NavCall {
    Destination(Vec3),
    Stopped(bool),
    Face(Vec3),
    Configure { speed: f32 },
}

/// Navigator that logs every request in order and keeps the latest of each.
#[derive(Default)]
pub struct RecordingNavigator {
    pub calls: Vec<NavCall>,
    pub destination: Option<Vec3>,
    pub stopped: bool,
    pub facing: Option<Vec3>,
    pub speed: f32,
}

impl RecordingNavigator {
    pub fn last_destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl Navigator for RecordingNavigator {
    fn set_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
        self.calls.push(NavCall::Destination(position));
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
        self.calls.push(NavCall::Stopped(stopped));
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn remaining_distance(&self) -> f32 {
        0.0
    }

    fn face_towards(&mut self, direction: Vec3) {
        self.facing = Some(direction);
        self.calls.push(NavCall::Face(direction));
    }

    fn configure(&mut self, speed: f32, _angular_speed: f32, _stopping_distance: f32) {
        self.speed = speed;
        self.calls.push(NavCall::Configure { speed });
    }
}
