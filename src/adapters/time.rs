//! Monotonic time adapter.
//!
//! Sample timestamps are seconds since the session started, taken from
//! `std::time::Instant` so wall-clock adjustments never reorder them.

use std::time::{Duration, Instant};

use crate::app::ports::TimePort;

/// Clock that starts counting when created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimePort for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
