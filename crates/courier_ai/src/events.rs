//! # AI Events
//!
//! Brains report what they did through a bounded crossbeam channel. The host
//! drains it once per frame to play effects, resolve damage and so on.
//!
//! ```text
//! AiBrain ─┐
//! AiBrain ─┼──> EventSender ──> [ bounded channel ] ──> EventReceiver ──> host
//! AiBrain ─┘
//! ```
//!
//! Sending never blocks a tick: when the channel is full the event is dropped.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use courier_shared::EntityId;

use crate::config::AiStateType;

/// Something a brain did or noticed.
#[derive(Clone, Debug, PartialEq)]
pub enum AiEvent {
    /// The active behaviour state changed.
    StateChanged {
        /// The NPC.
        npc: EntityId,
        /// Previous state, `None` on the first selection.
        from: Option<AiStateType>,
        /// New state.
        to: AiStateType,
    },

    /// A melee attack was executed. Damage resolution is the host's job.
    AttackExecuted {
        /// Attacking NPC.
        attacker: EntityId,
        /// Attacked entity.
        target: EntityId,
    },

    /// A beam was fired.
    BeamFired {
        /// Firing NPC.
        attacker: EntityId,
        /// Targeted entity.
        target: EntityId,
    },

    /// A noise was loud enough to alert the NPC.
    NoiseHeard {
        /// The NPC.
        npc: EntityId,
        /// Noise source.
        source: EntityId,
        /// Volume as perceived, in dB.
        perceived_volume: f32,
    },

    /// A new entity entered target memory.
    TargetAcquired {
        /// The NPC.
        npc: EntityId,
        /// The new target.
        target: EntityId,
        /// Starting threat.
        threat: f32,
    },

    /// An entity left target memory.
    TargetLost {
        /// The NPC.
        npc: EntityId,
        /// The forgotten target.
        target: EntityId,
    },
}

/// Bounded channel for AI events.
pub struct EventBus {
    sender: Sender<AiEvent>,
    receiver: Receiver<AiEvent>,
}

impl EventBus {
    /// Creates a bus holding at most `capacity` undrained events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// A sender handle; clone freely, one per brain is typical.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender { sender: self.sender.clone() }
    }

    /// A receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver { receiver: self.receiver.clone() }
    }

    /// Sender and receiver for a fresh bus.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<AiEvent>,
}

impl EventSender {
    /// Sends without blocking. Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: AiEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("AI event channel full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<AiEvent>,
}

impl EventReceiver {
    /// Every pending event, oldest first.
    #[inline]
    pub fn drain(&self) -> Vec<AiEvent> {
        self.receiver.try_iter().collect()
    }

    /// One pending event, if any.
    #[inline]
    pub fn try_recv(&self) -> Option<AiEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
