//! Frame timing handed to everything that ticks.

use crate::constants::PERCEPTION_INTERVAL;

/// One discrete step of the simulation clock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds elapsed since the previous frame.
    pub delta: f32,
    /// Monotonic frame counter, starting at 0.
    pub frame: u64,
}

impl FrameTime {
    /// Creates a frame time.
    #[must_use]
    pub const fn new(delta: f32, frame: u64) -> Self {
        Self { delta, frame }
    }

    /// True on frames where throttled perception should run.
    #[inline]
    #[must_use]
    pub const fn is_perception_frame(self) -> bool {
        self.frame % PERCEPTION_INTERVAL == 0
    }
}
