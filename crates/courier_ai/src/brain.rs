//! # AI Brain
//!
//! The per-NPC decision core. Each tick runs, in order:
//!
//! 1. Perception (every 10th frame): scan, refresh target memory, pick the
//!    highest-threat target
//! 2. Cooldowns count down by the frame delta
//! 3. Selection: the first configured state, in priority order, that is eligible
//! 4. Transition: outgoing `cleanup`, then incoming `initialize`
//! 5. The active state's `update`
//!
//! Higher-priority states preempt lower ones every tick; there is no
//! hysteresis beyond what each state's eligibility encodes.

use std::sync::Arc;

use courier_shared::{EntityId, FrameTime, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{AiStateType, NpcConfig};
use crate::error::AiResult;
use crate::events::{AiEvent, EventSender};
use crate::random::gaussian_between;
use crate::senses;
use crate::states::{flat_direction, AiState};
use crate::target::TargetList;
use crate::world::{Navigator, WorldQuery};

/// Cooldown jitter: resets land within this fraction of the mean.
const COOLDOWN_JITTER: f32 = 0.2;

/// A remembered noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseAlert {
    /// Entity that made the noise.
    pub source: EntityId,
    /// Where the noise came from.
    pub position: Vec3,
}

/// Brain data shared by every state.
pub(crate) struct BrainState<N> {
    pub(crate) npc: EntityId,
    pub(crate) config: Arc<NpcConfig>,
    pub(crate) navigator: N,
    pub(crate) targets: TargetList,
    pub(crate) current_target: Option<EntityId>,
    pub(crate) alert: Option<NoiseAlert>,
    pub(crate) owner: Option<EntityId>,
    pub(crate) attack_cooldown: f32,
    pub(crate) beam_cooldown: f32,
    rng: ChaCha8Rng,
    events: Option<EventSender>,
}

impl<N: Navigator> BrainState<N> {
    pub(crate) fn emit(&self, event: AiEvent) {
        if let Some(events) = &self.events {
            events.send(event);
        }
    }

    pub(crate) fn reset_attack_cooldown(&mut self) {
        let mean = self.config.attack_cooldown;
        self.attack_cooldown =
            gaussian_between(&mut self.rng, mean * (1.0 - COOLDOWN_JITTER), mean * (1.0 + COOLDOWN_JITTER));
    }

    pub(crate) fn target_position<W: WorldQuery + ?Sized>(&self, world: &W) -> Option<Vec3> {
        world.position(self.current_target?)
    }

    pub(crate) fn target_distance<W: WorldQuery + ?Sized>(&self, world: &W) -> Option<f32> {
        senses::distance_from_target(world, self.npc, self.current_target?)
    }

    pub(crate) fn owner_distance<W: WorldQuery + ?Sized>(&self, world: &W) -> Option<f32> {
        senses::distance_from_target(world, self.npc, self.owner?)
    }

    pub(crate) fn distance_to<W: WorldQuery + ?Sized>(&self, world: &W, point: Vec3) -> Option<f32> {
        Some(world.position(self.npc)?.distance(point))
    }

    pub(crate) fn flat_direction_to_target<W: WorldQuery + ?Sized>(&self, world: &W) -> Option<Vec3> {
        Some(flat_direction(world.position(self.npc)?, self.target_position(world)?))
    }
}

/// Decision core for one NPC.
///
/// Owns its target memory and navigator; reads the world through
/// [`WorldQuery`] on every [`AiBrain::update`].
pub struct AiBrain<N: Navigator> {
    core: BrainState<N>,
    states: Vec<AiState>,
    active: Option<usize>,
    perception_elapsed: f32,
    reported_no_state: bool,
}

impl<N: Navigator> AiBrain<N> {
    /// Creates a brain for `npc` with the archetype's states in priority order.
    ///
    /// `seed` drives cooldown jitter, so equal seeds give equal behaviour.
    ///
    /// # Errors
    ///
    /// Any [`NpcConfig::validate`] error: `NoStatesConfigured` if the
    /// archetype enables no states, `InvalidConfig` for out-of-range tuning.
    pub fn new(npc: EntityId, config: Arc<NpcConfig>, mut navigator: N, seed: u64) -> AiResult<Self> {
        let mut checked = NpcConfig::clone(&config);
        checked.validate()?;
        let kinds = checked.ai_state_types;

        navigator.configure(config.movement_speed, config.angular_speed, config.stopping_distance);
        let targets = TargetList::new(npc, config.enemy_types.clone(), config.alerted_memory);

        Ok(Self {
            core: BrainState {
                npc,
                config,
                navigator,
                targets,
                current_target: None,
                alert: None,
                owner: None,
                attack_cooldown: 0.0,
                beam_cooldown: 0.0,
                rng: ChaCha8Rng::seed_from_u64(seed),
                events: None,
            },
            states: kinds.into_iter().map(AiState::new).collect(),
            active: None,
            perception_elapsed: 0.0,
            reported_no_state: false,
        })
    }

    /// Builder: report events on `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.core.events = Some(sender);
        self
    }

    /// Runs one tick.
    pub fn update<W: WorldQuery + ?Sized>(&mut self, world: &W, time: FrameTime) {
        let elapsed = self.perception_elapsed + time.delta;
        if time.is_perception_frame() {
            self.perceive(world, elapsed);
            self.perception_elapsed = 0.0;
        } else {
            self.perception_elapsed = elapsed;
        }
        if self.core.current_target.is_some_and(|target| !world.is_alive(target)) {
            self.core.current_target = None;
        }

        self.core.attack_cooldown -= time.delta;
        self.core.beam_cooldown -= time.delta;

        let selected = self.states.iter().position(|state| state.is_eligible(&self.core, world));
        match selected {
            Some(index) => {
                self.reported_no_state = false;
                if self.active != Some(index) {
                    self.transition(Some(index));
                }
            }
            None => {
                if !self.reported_no_state {
                    tracing::error!(
                        "NPC {} ({}) has no eligible AI state; falling back to idle",
                        self.core.npc,
                        self.core.config.name
                    );
                    self.reported_no_state = true;
                    if self.active.is_none() {
                        self.core.emit(AiEvent::StateChanged { npc: self.core.npc, from: None, to: AiStateType::Idle });
                    }
                }
                if self.active.is_some() {
                    self.transition(None);
                }
            }
        }

        if let Some(index) = self.active {
            self.states[index].update(&mut self.core, world);
        }
    }

    fn perceive<W: WorldQuery + ?Sized>(&mut self, world: &W, elapsed: f32) {
        let npc = self.core.npc;
        let visible = senses::look_for_targets(world, npc, &self.core.config);
        let changes = self.core.targets.update(world, &visible, elapsed);

        for (target, threat) in changes.acquired {
            self.core.emit(AiEvent::TargetAcquired { npc, target, threat });
        }
        for target in changes.lost {
            self.core.emit(AiEvent::TargetLost { npc, target });
        }

        self.core.current_target = self
            .core
            .targets
            .highest_threat_target()
            .map(|target| target.entity)
            .filter(|&entity| world.is_alive(entity));
    }

    /// Outgoing cleanup strictly before incoming initialize.
    fn transition(&mut self, next: Option<usize>) {
        let from = self.active.map(|index| self.states[index].kind());
        if let Some(index) = self.active {
            self.states[index].cleanup(&mut self.core);
        }
        if let Some(index) = next {
            self.states[index].initialize(&mut self.core);
        }
        self.active = next;

        let to = next.map_or(AiStateType::Idle, |index| self.states[index].kind());
        tracing::debug!("NPC {} state {:?} -> {}", self.core.npc, from, to);
        self.core.emit(AiEvent::StateChanged { npc: self.core.npc, from, to });
    }

    /// Hears a noise of `volume` dB from `distance` away.
    ///
    /// Returns whether it was loud enough to remember. The newest audible
    /// noise replaces any earlier one.
    /// A negative or non-finite `distance` or `volume` is rejected and
    /// leaves the current alert untouched.
    pub fn attempt_to_hear_noise_source(&mut self, source: EntityId, origin: Vec3, distance: f32, volume: f32) -> bool {
        if !distance.is_finite() || distance < 0.0 || !volume.is_finite() {
            tracing::warn!(
                "NPC {} rejected noise from {}: distance {}, volume {}",
                self.core.npc,
                source,
                distance,
                volume
            );
            return false;
        }

        let config = &self.core.config;
        let perceived = senses::sound_attenuation(volume, distance, config.reference_distance);
        if perceived < config.noise_floor {
            tracing::trace!("NPC {} ignored noise at {:.1} dB", self.core.npc, perceived);
            return false;
        }

        self.core.alert = Some(NoiseAlert { source, position: origin });
        self.core.emit(AiEvent::NoiseHeard { npc: self.core.npc, source, perceived_volume: perceived });
        true
    }

    /// Draws a fresh attack cooldown around the configured mean (±20%).
    pub fn reset_attack_cooldown(&mut self) {
        self.core.reset_attack_cooldown();
    }

    /// Sets or clears the owner a summon follows.
    pub fn set_owner(&mut self, owner: Option<EntityId>) {
        self.core.owner = owner;
    }

    /// The NPC this brain drives.
    #[must_use]
    pub fn npc(&self) -> EntityId {
        self.core.npc
    }

    /// Archetype tuning.
    #[must_use]
    pub fn config(&self) -> &NpcConfig {
        &self.core.config
    }

    /// Owner, for summons.
    #[must_use]
    pub fn owner(&self) -> Option<EntityId> {
        self.core.owner
    }

    /// Target memory.
    #[must_use]
    pub fn targets(&self) -> &TargetList {
        &self.core.targets
    }

    /// Target memory, for the damage-aggro hook.
    pub fn targets_mut(&mut self) -> &mut TargetList {
        &mut self.core.targets
    }

    /// Target chosen at the last perception pass.
    #[must_use]
    pub fn current_target(&self) -> Option<EntityId> {
        self.core.current_target
    }

    /// Remembered noise, if any.
    #[must_use]
    pub fn noise_alert(&self) -> Option<NoiseAlert> {
        self.core.alert
    }

    /// Active state; `None` before the first tick or while nothing is eligible.
    #[must_use]
    pub fn active_state(&self) -> Option<AiStateType> {
        self.active.map(|index| self.states[index].kind())
    }

    /// Configured states in priority order.
    #[must_use]
    pub fn configured_states(&self) -> Vec<AiStateType> {
        self.states.iter().map(AiState::kind).collect()
    }

    /// Seconds until the next attack is allowed; zero or less means ready.
    #[must_use]
    pub fn attack_cooldown_remaining(&self) -> f32 {
        self.core.attack_cooldown
    }

    /// The navigator.
    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.core.navigator
    }

    /// The navigator, mutably.
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.core.navigator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BeamConfig;
    use crate::error::AiError;
    use crate::events::EventBus;
    use crate::world::testing::{Arena, RecordingNavigator};

    fn frame(n: u64) -> FrameTime {
        FrameTime::new(0.1, n)
    }

    fn brain(states: Vec<AiStateType>) -> (Arena, AiBrain<RecordingNavigator>) {
        let mut world = Arena::default();
        let npc = world.spawn(0, "Wolf", Vec3::ZERO);
        let config = Arc::new(NpcConfig { ai_state_types: states, ..NpcConfig::default() });
        (world, AiBrain::new(npc, config, RecordingNavigator::default(), 7).unwrap())
    }

    #[test]
    fn test_new_requires_states() {
        let config = Arc::new(NpcConfig { ai_state_types: Vec::new(), ..NpcConfig::default() });
        let result = AiBrain::new(EntityId::new(0, 0), config, RecordingNavigator::default(), 1);
        assert!(matches!(result, Err(AiError::NoStatesConfigured(_))));
    }

    #[test]
    fn test_new_rejects_out_of_range_tuning() {
        let config = Arc::new(NpcConfig { reference_distance: 0.0, ..NpcConfig::default() });
        let result = AiBrain::new(EntityId::new(0, 0), config, RecordingNavigator::default(), 1);
        assert!(matches!(result, Err(AiError::InvalidConfig(_))));

        let config = Arc::new(NpcConfig { ai_state_types: vec![AiStateType::Beam], ..NpcConfig::default() });
        let result = AiBrain::new(EntityId::new(0, 0), config, RecordingNavigator::default(), 1);
        assert!(matches!(result, Err(AiError::InvalidConfig(_))));
    }

    #[test]
    fn test_states_sorted_and_navigator_configured() {
        let (_, brain) = brain(vec![AiStateType::Idle, AiStateType::Chase, AiStateType::Attack]);
        assert_eq!(brain.configured_states(), vec![AiStateType::Attack, AiStateType::Chase, AiStateType::Idle]);
        assert_eq!(brain.navigator().speed, NpcConfig::default().movement_speed);
    }

    #[test]
    fn test_idle_without_targets() {
        let (world, mut brain) = brain(vec![AiStateType::Attack, AiStateType::Chase, AiStateType::Idle]);
        brain.update(&world, frame(0));
        assert_eq!(brain.active_state(), Some(AiStateType::Idle));
    }

    #[test]
    fn test_attack_preempts_chase() {
        let (mut world, mut brain) = brain(vec![AiStateType::Idle, AiStateType::Chase, AiStateType::Attack]);
        let player = world.spawn(1, "Player", Vec3::new(0.0, 0.0, 1.5));
        brain.update(&world, frame(0));
        assert_eq!(brain.current_target(), Some(player));
        assert_eq!(brain.active_state(), Some(AiStateType::Attack));
        // Attack fired and reset the cooldown within ±20% of the mean.
        let cooldown = brain.attack_cooldown_remaining();
        assert!((1.2..=1.8).contains(&cooldown), "cooldown {cooldown}");
        assert!(brain.navigator().stopped);
    }

    #[test]
    fn test_chase_far_target() {
        let (mut world, mut brain) = brain(vec![AiStateType::Attack, AiStateType::Chase, AiStateType::Idle]);
        world.spawn(1, "Player", Vec3::new(0.0, 0.0, 10.0));
        brain.update(&world, frame(0));
        assert_eq!(brain.active_state(), Some(AiStateType::Chase));
        assert_eq!(brain.navigator().destination, Some(Vec3::new(0.0, 0.0, 10.0)));
        assert!(!brain.navigator().stopped);
    }

    #[test]
    fn test_combat_idle_while_cooling_down() {
        let (mut world, mut brain) =
            brain(vec![AiStateType::Attack, AiStateType::Chase, AiStateType::CombatIdle, AiStateType::Idle]);
        world.spawn(1, "Player", Vec3::new(0.0, 1.0, 1.5));
        brain.update(&world, frame(0));
        assert_eq!(brain.active_state(), Some(AiStateType::Attack));

        brain.update(&world, frame(1));
        assert_eq!(brain.active_state(), Some(AiStateType::CombatIdle));
        // Yaw-only facing ignores the height difference.
        assert_eq!(brain.navigator().facing, Some(Vec3::new(0.0, 0.0, 1.5)));

        // Cooldown expires (at most 1.8s): Attack preempts again.
        let reattacked = (2..30).any(|n| {
            brain.update(&world, frame(n));
            brain.active_state() == Some(AiStateType::Attack)
        });
        assert!(reattacked);
    }

    #[test]
    fn test_non_hostile_is_ignored() {
        let (mut world, mut brain) = brain(vec![AiStateType::Attack, AiStateType::Chase, AiStateType::Idle]);
        let deer = world.spawn(1, "Deer", Vec3::new(0.0, 0.0, 5.0));
        brain.update(&world, frame(0));
        assert!(brain.targets().contains(deer));
        assert_eq!(brain.current_target(), None);
        assert_eq!(brain.active_state(), Some(AiStateType::Idle));

        // Damage makes it a threat at the next perception pass.
        brain.targets_mut().update_threat_or_add_target(deer, 2.0);
        brain.update(&world, frame(10));
        assert_eq!(brain.current_target(), Some(deer));
        assert_eq!(brain.active_state(), Some(AiStateType::Chase));
    }

    #[test]
    fn test_noise_investigation() {
        let (mut world, mut brain) = brain(vec![AiStateType::Investigate, AiStateType::Idle]);
        let source = world.spawn(1, "Rock", Vec3::new(-30.0, 0.0, 0.0));

        assert!(!brain.attempt_to_hear_noise_source(source, Vec3::new(-30.0, 0.0, 0.0), 1000.0, 40.0));
        assert!(brain.noise_alert().is_none());

        assert!(brain.attempt_to_hear_noise_source(source, Vec3::new(-30.0, 0.0, 0.0), 30.0, 80.0));
        brain.update(&world, frame(0));
        assert_eq!(brain.active_state(), Some(AiStateType::Investigate));
        assert_eq!(brain.navigator().destination, Some(Vec3::new(-30.0, 0.0, 0.0)));

        // Arrive: the alert clears, and Idle takes over.
        world.move_to(brain.npc(), Vec3::new(-29.0, 0.0, 0.0));
        brain.update(&world, frame(1));
        assert!(brain.noise_alert().is_none());
        brain.update(&world, frame(2));
        assert_eq!(brain.active_state(), Some(AiStateType::Idle));
    }

    #[test]
    fn test_newest_noise_wins() {
        let (_, mut brain) = brain(vec![AiStateType::Investigate, AiStateType::Idle]);
        let loud = EntityId::new(5, 0);
        let quiet = EntityId::new(6, 0);
        assert!(brain.attempt_to_hear_noise_source(loud, Vec3::new(5.0, 0.0, 0.0), 5.0, 100.0));
        assert!(brain.attempt_to_hear_noise_source(quiet, Vec3::new(9.0, 0.0, 0.0), 9.0, 50.0));
        assert_eq!(brain.noise_alert().map(|alert| alert.source), Some(quiet));
    }

    #[test]
    fn test_invalid_noise_distance_ignored() {
        let (_, mut brain) = brain(vec![AiStateType::Investigate, AiStateType::Idle]);
        let source = EntityId::new(5, 0);
        assert!(brain.attempt_to_hear_noise_source(source, Vec3::new(4.0, 0.0, 0.0), 4.0, 60.0));
        let before = brain.noise_alert();

        let elsewhere = EntityId::new(6, 0);
        assert!(!brain.attempt_to_hear_noise_source(elsewhere, Vec3::ZERO, f32::NAN, 10.0));
        assert!(!brain.attempt_to_hear_noise_source(elsewhere, Vec3::ZERO, -5.0, 10.0));
        assert!(!brain.attempt_to_hear_noise_source(elsewhere, Vec3::ZERO, f32::INFINITY, 10.0));
        assert!(!brain.attempt_to_hear_noise_source(elsewhere, Vec3::ZERO, 1.0, f32::NAN));
        assert_eq!(brain.noise_alert(), before);
    }

    #[test]
    fn test_follow_owner() {
        let (mut world, mut brain) = brain(vec![AiStateType::Follow, AiStateType::Idle]);
        let owner = world.spawn(1, "Player", Vec3::new(10.0, 0.0, 0.0));
        brain.set_owner(Some(owner));

        brain.update(&world, frame(1));
        assert_eq!(brain.active_state(), Some(AiStateType::Follow));
        // Just ahead of the owner, along its forward.
        assert_eq!(brain.navigator().destination, Some(Vec3::new(10.0, 0.0, 1.5)));

        world.move_to(brain.npc(), Vec3::new(9.5, 0.0, 0.5));
        brain.update(&world, frame(2));
        brain.update(&world, frame(3));
        assert_eq!(brain.active_state(), Some(AiStateType::Idle));
        assert!(brain.navigator().stopped);
    }

    #[test]
    fn test_no_eligible_state_falls_back() {
        let (mut world, mut brain) = brain(vec![AiStateType::Chase]);
        let player = world.spawn(1, "Player", Vec3::new(0.0, 0.0, 10.0));
        brain.update(&world, frame(0));
        assert_eq!(brain.active_state(), Some(AiStateType::Chase));

        world.kill(player);
        brain.update(&world, frame(1));
        assert_eq!(brain.active_state(), None);
        assert!(brain.navigator().stopped);
        brain.update(&world, frame(2));
        assert_eq!(brain.active_state(), None);
    }

    #[test]
    fn test_no_eligible_state_on_first_tick_reported() {
        let (world, brain) = brain(vec![AiStateType::Chase]);
        let bus = EventBus::new(16);
        let mut brain = brain.with_events(bus.sender());

        brain.update(&world, frame(0));
        brain.update(&world, frame(1));
        assert_eq!(brain.active_state(), None);

        let events = bus.receiver().drain();
        let changes: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                AiEvent::StateChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![(None, AiStateType::Idle)]);
    }

    #[test]
    fn test_beam_then_chase() {
        let mut world = Arena::default();
        let npc = world.spawn(0, "Warden", Vec3::ZERO);
        world.spawn(1, "Player", Vec3::new(0.0, 0.0, 10.0));
        let config = Arc::new(NpcConfig {
            ai_state_types: vec![AiStateType::Beam, AiStateType::Chase, AiStateType::Idle],
            beam: Some(BeamConfig { range: 15.0, cooldown: 4.0 }),
            ..NpcConfig::default()
        });
        let bus = EventBus::new(64);
        let mut brain = AiBrain::new(npc, config, RecordingNavigator::default(), 3).unwrap().with_events(bus.sender());

        brain.update(&world, frame(0));
        assert_eq!(brain.active_state(), Some(AiStateType::Beam));
        brain.update(&world, frame(1));
        assert_eq!(brain.active_state(), Some(AiStateType::Chase));

        let events = bus.receiver().drain();
        assert!(events.iter().any(|e| matches!(e, AiEvent::BeamFired { .. })));
        assert!(events.iter().any(|e| matches!(e, AiEvent::TargetAcquired { threat, .. } if *threat == 1.0)));
        let changes: Vec<AiStateType> = events
            .iter()
            .filter_map(|e| match e {
                AiEvent::StateChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![AiStateType::Beam, AiStateType::Chase]);
    }
}
