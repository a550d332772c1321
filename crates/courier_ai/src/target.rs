//! # Target Memory
//!
//! Per-NPC, threat-ranked memory of perceived entities.
//!
//! Targets are added when first seen, refreshed while visible, and
//! forgotten once they die or stay unseen longer than the memory window.
//! At most one entry exists per entity.

use courier_shared::EntityId;

use crate::world::WorldQuery;

/// One remembered entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    /// The perceived entity.
    pub entity: EntityId,
    /// Engagement priority. Only positive threat makes a target eligible.
    pub threat: f32,
    /// Seconds since the target was last seen.
    pub last_seen: f32,
    /// Distance at the last refresh.
    pub last_known_distance: f32,
    /// Visible at the last refresh.
    pub in_los: bool,
}

impl Target {
    fn new(entity: EntityId, threat: f32) -> Self {
        Self {
            entity,
            threat,
            last_seen: 0.0,
            last_known_distance: 0.0,
            in_los: false,
        }
    }
}

/// What changed during one [`TargetList::update`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetChanges {
    /// Newly tracked entities with their starting threat.
    pub acquired: Vec<(EntityId, f32)>,
    /// Entities dropped from memory.
    pub lost: Vec<EntityId>,
}

/// Threat-ranked target memory owned by one brain.
#[derive(Clone, Debug)]
pub struct TargetList {
    owner: EntityId,
    enemy_types: Vec<String>,
    alerted_memory: f32,
    targets: Vec<Target>,
}

impl TargetList {
    /// Creates an empty list for the NPC `owner`.
    #[must_use]
    pub fn new(owner: EntityId, enemy_types: Vec<String>, alerted_memory: f32) -> Self {
        Self { owner, enemy_types, alerted_memory, targets: Vec::new() }
    }

    /// Refreshes memory from this perception pass.
    ///
    /// `elapsed` is the time since the previous pass; unseen targets age by it.
    pub fn update<W: WorldQuery + ?Sized>(&mut self, world: &W, visible: &[EntityId], elapsed: f32) -> TargetChanges {
        let mut changes = TargetChanges::default();
        let visible: Vec<EntityId> = visible.iter().copied().filter(|&entity| world.is_alive(entity)).collect();

        for &entity in &visible {
            if !self.contains(entity) {
                let hostile = world.tag(entity).is_some_and(|tag| self.enemy_types.iter().any(|t| t == tag));
                let threat = if hostile { 1.0 } else { 0.0 };
                self.targets.push(Target::new(entity, threat));
                changes.acquired.push((entity, threat));
            }
        }

        for target in &mut self.targets {
            target.in_los = visible.contains(&target.entity);
            if target.in_los {
                target.last_seen = 0.0;
            } else {
                target.last_seen += elapsed;
            }
        }

        let memory = self.alerted_memory;
        self.targets.retain(|target| {
            let keep = world.is_alive(target.entity) && target.last_seen <= memory;
            if !keep {
                changes.lost.push(target.entity);
            }
            keep
        });

        let origin = world.position(self.owner);
        for target in &mut self.targets {
            if let (Some(from), Some(to)) = (origin, world.position(target.entity)) {
                target.last_known_distance = from.distance(to);
            }
        }

        changes
    }

    /// Adds `amount` to an entity's threat, tracking it first if needed.
    ///
    /// The damage-aggro hook: new entries start at 0 before `amount` applies.
    pub fn update_threat_or_add_target(&mut self, entity: EntityId, amount: f32) {
        match self.targets.iter_mut().find(|target| target.entity == entity) {
            Some(target) => target.threat += amount,
            None => self.targets.push(Target::new(entity, amount)),
        }
    }

    /// The positive-threat target with the highest threat.
    ///
    /// Ties go to the target tracked first. `None` if no threat is positive.
    #[must_use]
    pub fn highest_threat_target(&self) -> Option<&Target> {
        self.targets
            .iter()
            .filter(|target| target.threat > 0.0)
            .fold(None, |best: Option<&Target>, target| match best {
                Some(current) if current.threat >= target.threat => Some(current),
                _ => Some(target),
            })
    }

    /// Entry for an entity.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&Target> {
        self.targets.iter().find(|target| target.entity == entity)
    }

    /// Whether an entity is tracked.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.get(entity).is_some()
    }

    /// All entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
