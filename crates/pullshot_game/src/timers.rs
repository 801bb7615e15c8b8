//! Millisecond countdowns driven by the frame delta

/// A timer that runs down to zero and stays there
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Countdown {
    remaining_ms: f32,
}

impl Countdown {
    /// A countdown that is already finished
    pub const IDLE: Self = Self { remaining_ms: 0.0 };

    /// Start a countdown of `duration_ms` milliseconds
    pub fn new(duration_ms: f32) -> Self {
        Self {
            remaining_ms: duration_ms.max(0.0),
        }
    }

    /// Restart from `duration_ms`
    pub fn reset(&mut self, duration_ms: f32) {
        self.remaining_ms = duration_ms.max(0.0);
    }

    /// Run the countdown down by `dt_ms`
    ///
    /// Returns true on the tick that brings it to zero.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.remaining_ms <= 0.0 {
            return false;
        }
        self.remaining_ms = (self.remaining_ms - dt_ms.max(0.0)).max(0.0);
        self.remaining_ms == 0.0
    }

    #[inline]
    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.remaining_ms > 0.0
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining_ms <= 0.0
    }
}
