//! # NPC Scheduler
//!
//! Drives every registered brain once per tick:
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────┐
//! │ 1. ADVANCE CLOCK                                            │
//! │    └─ Clamp delta, bump frame counter -> FrameTime           │
//! │                                                             │
//! │ 2. BRAINS (registration order)                              │
//! │    ├─ Perception on every 10th frame                        │
//! │    ├─ State selection and transition                        │
//! │    └─ Active state update -> events                         │
//! │                                                             │
//! │ 3. HOST DRAINS EVENTS                                       │
//! │    └─ Attacks, beams, state changes                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Brains are registered and deregistered explicitly; nothing is discovered
//! behind the host's back.

use courier_ai::{AiBrain, AiEvent, EventBus, EventReceiver, Navigator, WorldQuery};
use courier_shared::{EntityId, FrameTime, Vec3};

use crate::error::{CourierError, CourierResult};

/// Longest delta a single tick will simulate, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Default AI event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 2048;

/// Produces [`FrameTime`]s from raw host deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    frame: u64,
    elapsed: f64,
    started: bool,
}

impl FrameClock {
    /// A clock whose first tick is frame 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { frame: 0, elapsed: 0.0, started: false }
    }

    /// Advances one frame. The delta is clamped to `[0, MAX_FRAME_DELTA]`
    /// so a stall does not teleport every NPC.
    pub fn advance(&mut self, delta: f32) -> FrameTime {
        if self.started {
            self.frame += 1;
        }
        self.started = true;

        let delta = if delta.is_nan() { 0.0 } else { delta.clamp(0.0, MAX_FRAME_DELTA) };
        self.elapsed += f64::from(delta);
        FrameTime::new(delta, self.frame)
    }

    /// Frames advanced so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        if self.started {
            self.frame + 1
        } else {
            0
        }
    }

    /// Simulated seconds so far.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Opaque handle to a registered brain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NpcHandle(u64);

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    /// The frame that ran.
    pub time: FrameTime,
    /// Brains updated.
    pub brains_updated: usize,
    /// Whether this frame ran perception.
    pub perception: bool,
}

/// Owns registered brains and ticks them in registration order.
pub struct NpcScheduler<N: Navigator> {
    brains: Vec<(NpcHandle, AiBrain<N>)>,
    next_handle: u64,
    clock: FrameClock,
    events: EventBus,
}

impl<N: Navigator> Default for NpcScheduler<N> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl<N: Navigator> NpcScheduler<N> {
    /// An empty scheduler whose event channel holds `event_capacity` events.
    #[must_use]
    pub fn new(event_capacity: usize) -> Self {
        Self { brains: Vec::new(), next_handle: 0, clock: FrameClock::new(), events: EventBus::new(event_capacity) }
    }

    /// Takes ownership of a brain and wires it to the scheduler's event bus.
    pub fn register(&mut self, brain: AiBrain<N>) -> NpcHandle {
        let handle = NpcHandle(self.next_handle);
        self.next_handle += 1;
        tracing::debug!("Registered NPC {} as {:?}", brain.npc(), handle);
        self.brains.push((handle, brain.with_events(self.events.sender())));
        handle
    }

    /// Removes a brain and hands it back.
    ///
    /// # Errors
    ///
    /// `UnknownNpc` if the handle is not registered.
    pub fn deregister(&mut self, handle: NpcHandle) -> CourierResult<AiBrain<N>> {
        let index = self
            .brains
            .iter()
            .position(|(h, _)| *h == handle)
            .ok_or(CourierError::UnknownNpc(handle))?;
        let (_, brain) = self.brains.remove(index);
        tracing::debug!("Deregistered NPC {} ({:?})", brain.npc(), handle);
        Ok(brain)
    }

    /// Advances the clock and updates every brain once.
    pub fn tick<W: WorldQuery + ?Sized>(&mut self, world: &W, delta: f32) -> TickStats {
        let time = self.clock.advance(delta);
        for (_, brain) in &mut self.brains {
            brain.update(world, time);
        }
        TickStats { time, brains_updated: self.brains.len(), perception: time.is_perception_frame() }
    }

    /// Lets every brain try to hear a noise made at `origin`.
    ///
    /// Returns how many brains noticed it.
    pub fn broadcast_noise<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        source: EntityId,
        origin: Vec3,
        volume: f32,
    ) -> usize {
        let mut heard = 0;
        for (_, brain) in &mut self.brains {
            let Some(position) = world.position(brain.npc()) else {
                continue;
            };
            if brain.attempt_to_hear_noise_source(source, origin, position.distance(origin), volume) {
                heard += 1;
            }
        }
        heard
    }

    /// Brain by handle.
    #[must_use]
    pub fn brain(&self, handle: NpcHandle) -> Option<&AiBrain<N>> {
        self.brains.iter().find(|(h, _)| *h == handle).map(|(_, brain)| brain)
    }

    /// Brain by handle, mutably.
    pub fn brain_mut(&mut self, handle: NpcHandle) -> Option<&mut AiBrain<N>> {
        self.brains.iter_mut().find(|(h, _)| *h == handle).map(|(_, brain)| brain)
    }

    /// Handles in registration order.
    pub fn handles(&self) -> impl Iterator<Item = NpcHandle> + '_ {
        self.brains.iter().map(|(handle, _)| *handle)
    }

    /// Number of registered brains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.brains.len()
    }

    /// Whether no brains are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brains.is_empty()
    }

    /// The scheduler's clock.
    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// A receiver for every registered brain's events.
    #[must_use]
    pub fn event_receiver(&self) -> EventReceiver {
        self.events.receiver()
    }

    /// Drains pending events.
    #[must_use]
    pub fn drain_events(&self) -> Vec<AiEvent> {
        self.events.receiver().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_shared::DEFAULT_DELTA;

    #[test]
    fn test_clock_counts_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);
        let first = clock.advance(DEFAULT_DELTA);
        let second = clock.advance(DEFAULT_DELTA);
        assert_eq!(first.frame, 0);
        assert_eq!(second.frame, 1);
        assert!(first.is_perception_frame());
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_clock_clamps_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5.0).delta, MAX_FRAME_DELTA);
        assert_eq!(clock.advance(-1.0).delta, 0.0);
        assert_eq!(clock.advance(f32::NAN).delta, 0.0);
        assert!((clock.elapsed() - f64::from(MAX_FRAME_DELTA)).abs() < 1e-9);
    }
}
