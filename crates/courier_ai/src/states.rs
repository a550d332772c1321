//! # Behaviour States
//!
//! Each state follows the same four-phase contract:
//!
//! | Phase | When |
//! |-------|------|
//! | `is_eligible` | every tick, in priority order, until one says yes |
//! | `initialize` | on becoming active, after the outgoing state's `cleanup` |
//! | `update` | every tick while active, including the first |
//! | `cleanup` | on losing the active slot |
//!
//! Variants carry only their own latches; everything shared lives in the
//! brain's [`BrainState`].

use courier_shared::Vec3;

use crate::brain::BrainState;
use crate::config::AiStateType;
use crate::events::AiEvent;
use crate::senses;
use crate::world::{Navigator, WorldQuery};

/// Combat states engage out to this multiple of the engagement distance.
pub const COMBAT_REACH: f32 = 1.1;

/// A follower stops latching once this close to its goal.
pub const FOLLOW_ARRIVAL_DISTANCE: f32 = 2.0;

/// How far ahead of the owner a follower aims.
pub const FOLLOW_LEAD: f32 = 1.5;

/// One configured behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AiState {
    Attack,
    Beam,
    Chase,
    Investigate { navigating: bool },
    CombatIdle,
    Follow { following: bool },
    Idle,
}

impl AiState {
    pub(crate) const fn new(kind: AiStateType) -> Self {
        match kind {
            AiStateType::Attack => Self::Attack,
            AiStateType::Beam => Self::Beam,
            AiStateType::Chase => Self::Chase,
            AiStateType::Investigate => Self::Investigate { navigating: false },
            AiStateType::CombatIdle => Self::CombatIdle,
            AiStateType::Follow => Self::Follow { following: false },
            AiStateType::Idle => Self::Idle,
        }
    }

    pub(crate) const fn kind(&self) -> AiStateType {
        match self {
            Self::Attack => AiStateType::Attack,
            Self::Beam => AiStateType::Beam,
            Self::Chase => AiStateType::Chase,
            Self::Investigate { .. } => AiStateType::Investigate,
            Self::CombatIdle => AiStateType::CombatIdle,
            Self::Follow { .. } => AiStateType::Follow,
            Self::Idle => AiStateType::Idle,
        }
    }

    pub(crate) fn is_eligible<N: Navigator, W: WorldQuery + ?Sized>(&self, brain: &BrainState<N>, world: &W) -> bool {
        let config = &brain.config;
        let target_distance = brain.target_distance(world);
        let within_reach = |distance: f32| distance <= config.engagement_distance * COMBAT_REACH;

        match self {
            Self::Idle => brain.current_target.is_none(),
            Self::Follow { following } => {
                *following || brain.owner_distance(world).is_some_and(|distance| distance > config.follow_radius)
            }
            Self::Investigate { .. } => {
                let Some(alert) = brain.alert else {
                    return false;
                };
                brain.current_target.is_none()
                    && brain.distance_to(world, alert.position).is_some_and(|distance| distance > config.attack_range)
            }
            Self::CombatIdle => brain.attack_cooldown > 0.0 && target_distance.is_some_and(within_reach),
            Self::Chase => target_distance.is_some_and(|distance| distance > config.engagement_distance),
            Self::Attack => brain.attack_cooldown <= 0.0 && target_distance.is_some_and(within_reach),
            Self::Beam => {
                let (Some(beam), Some(target), Some(distance)) = (config.beam, brain.current_target, target_distance)
                else {
                    return false;
                };
                brain.beam_cooldown <= 0.0
                    && distance <= beam.range
                    && senses::is_target_in_los(world, brain.npc, target, config)
            }
        }
    }

    pub(crate) fn initialize<N: Navigator>(&mut self, brain: &mut BrainState<N>) {
        match self {
            Self::Investigate { navigating } => {
                *navigating = false;
                brain.navigator.set_stopped(false);
            }
            Self::Follow { .. } | Self::Chase => brain.navigator.set_stopped(false),
            Self::Attack | Self::Beam | Self::CombatIdle | Self::Idle => {}
        }
    }

    pub(crate) fn cleanup<N: Navigator>(&mut self, brain: &mut BrainState<N>) {
        match self {
            Self::Follow { following } => {
                *following = false;
                brain.navigator.set_stopped(true);
            }
            Self::Investigate { navigating } => {
                *navigating = false;
                brain.alert = None;
            }
            Self::Chase => brain.navigator.set_stopped(true),
            Self::Beam => brain.navigator.set_stopped(false),
            Self::Attack | Self::CombatIdle | Self::Idle => {}
        }
    }

    pub(crate) fn update<N: Navigator, W: WorldQuery + ?Sized>(&mut self, brain: &mut BrainState<N>, world: &W) {
        match self {
            Self::Idle => {}
            Self::Follow { following } => update_follow(following, brain, world),
            Self::Investigate { navigating } => {
                let Some(alert) = brain.alert else {
                    return;
                };
                if !*navigating {
                    brain.navigator.set_destination(alert.position);
                    *navigating = true;
                }
                if brain.distance_to(world, alert.position).is_some_and(|d| d <= brain.config.attack_range) {
                    tracing::debug!("NPC {} reached noise at {:?}", brain.npc, alert.position);
                    brain.alert = None;
                }
            }
            Self::CombatIdle => {
                if let Some(direction) = brain.flat_direction_to_target(world) {
                    brain.navigator.face_towards(direction);
                }
            }
            Self::Chase => {
                if let Some(position) = brain.target_position(world) {
                    brain.navigator.set_destination(position);
                }
            }
            Self::Attack => update_attack(brain, world),
            Self::Beam => {
                let (Some(target), Some(beam)) = (brain.current_target, brain.config.beam) else {
                    return;
                };
                brain.navigator.set_stopped(true);
                if let Some(direction) = brain.flat_direction_to_target(world) {
                    brain.navigator.face_towards(direction);
                }
                brain.emit(AiEvent::BeamFired { attacker: brain.npc, target });
                brain.beam_cooldown = beam.cooldown;
            }
        }
    }
}

fn update_follow<N: Navigator, W: WorldQuery + ?Sized>(following: &mut bool, brain: &mut BrainState<N>, world: &W) {
    let owner = brain.owner.and_then(|owner| Some((world.position(owner)?, world.forward(owner)?)));
    let Some((owner_position, owner_forward)) = owner else {
        *following = false;
        brain.navigator.set_stopped(true);
        return;
    };

    let goal = owner_position + owner_forward.flattened().normalized() * FOLLOW_LEAD;
    brain.navigator.set_destination(goal);
    *following = true;
    if brain.distance_to(world, goal).is_some_and(|distance| distance <= FOLLOW_ARRIVAL_DISTANCE) {
        *following = false;
    }
}

fn update_attack<N: Navigator, W: WorldQuery + ?Sized>(brain: &mut BrainState<N>, world: &W) {
    let (Some(target), Some(position), Some(distance)) =
        (brain.current_target, brain.target_position(world), brain.target_distance(world))
    else {
        return;
    };

    if distance <= brain.config.attack_range {
        brain.navigator.set_stopped(true);
        if let Some(direction) = brain.flat_direction_to_target(world) {
            brain.navigator.face_towards(direction);
        }
        brain.emit(AiEvent::AttackExecuted { attacker: brain.npc, target });
        brain.reset_attack_cooldown();
        tracing::debug!("NPC {} attacked {}, next in {:.2}s", brain.npc, target, brain.attack_cooldown);
    } else {
        brain.navigator.set_stopped(false);
        brain.navigator.set_destination(position);
    }
}

/// Yaw-only direction: the vertical component is dropped.
pub(crate) fn flat_direction(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).flattened()
}
