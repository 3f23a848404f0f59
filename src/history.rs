//! Sliding-window sample history.
//!
//! The session owns exactly one [`HistoryBuffer`].  Each successful cycle
//! appends one [`Sample`]; once the window is full the oldest sample is
//! evicted (FIFO).  Consumers never see the buffer itself, only
//! [`Snapshot`] copies, so a snapshot can never observe a half-applied
//! append.
//!
//! ```text
//!   append ──▶ [ s(n-99) … s(n-1) s(n) ] ──▶ evict s(n-100)
//!                         │
//!                         └──▶ snapshot() (point-in-time copy)
//! ```

use heapless::Deque;
use serde::Serialize;

use crate::control::{ActuatorCommand, Reading};

/// Hard upper bound on the window length (fixed-capacity storage).
pub const HISTORY_CAPACITY_MAX: usize = 100;

/// Fixed y-range for the fan/window step channels.
pub const STATE_AXIS: (f64, f64) = (-0.1, 1.1);

/// Point-in-time copy of the window, oldest first.
pub type Snapshot = heapless::Vec<Sample, HISTORY_CAPACITY_MAX>;

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// One completed cycle, as displayed.  Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Seconds since session start.
    pub timestamp: f64,
    pub temperature: f64,
    pub co_level: f64,
    /// 1 = fan on.
    pub fan_state: u8,
    /// 1 = window open.
    pub window_state: u8,
}

impl Sample {
    pub fn new(reading: &Reading, command: &ActuatorCommand) -> Self {
        Self {
            timestamp: reading.received_at.as_secs_f64(),
            temperature: reading.temperature,
            co_level: reading.co_level,
            fan_state: command.fan.state_bit(),
            window_state: command.window.state_bit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Display window
// ---------------------------------------------------------------------------

/// Axis bounds a plotter should use for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayWindow {
    pub x_min: f64,
    pub x_max: f64,
    /// Lower bound shared by the temperature and CO traces.
    pub y_min: f64,
    pub y_max: f64,
}

impl DisplayWindow {
    /// Bounds for a single sample: the trailing `span_secs` ending at the
    /// sample (never below zero) plus `margin_secs` of headroom, and its
    /// temperature/CO range padded by one unit.
    pub fn around(sample: &Sample, span_secs: f64, margin_secs: f64) -> Self {
        Self {
            x_min: (sample.timestamp - span_secs).max(0.0),
            x_max: sample.timestamp + margin_secs,
            y_min: sample.temperature.min(sample.co_level) - 1.0,
            y_max: sample.temperature.max(sample.co_level) + 1.0,
        }
    }

    /// Bounds for `samples`: time axis anchored on the newest sample, value
    /// axis covering every temperature and CO value.  `None` when empty.
    pub fn compute(samples: &[Sample], span_secs: f64, margin_secs: f64) -> Option<Self> {
        let last = samples.last()?;
        let mut window = Self::around(last, span_secs, margin_secs);
        for s in samples {
            window.y_min = window.y_min.min(s.temperature.min(s.co_level) - 1.0);
            window.y_max = window.y_max.max(s.temperature.max(s.co_level) + 1.0);
        }
        Some(window)
    }
}

// ---------------------------------------------------------------------------
// HistoryBuffer
// ---------------------------------------------------------------------------

/// Bounded append-only window of the most recent samples.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: Deque<Sample, HISTORY_CAPACITY_MAX>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty window holding at most `capacity` samples.
    /// `capacity` is clamped into `1..=HISTORY_CAPACITY_MAX`.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(
            (1..=HISTORY_CAPACITY_MAX).contains(&capacity),
            "history capacity out of range: {capacity}"
        );
        Self {
            samples: Deque::new(),
            capacity: capacity.clamp(1, HISTORY_CAPACITY_MAX),
        }
    }

    /// Insert at the tail, evicting from the head to stay within capacity.
    /// Returns the evicted sample, if any.
    pub fn append(&mut self, sample: Sample) -> Option<Sample> {
        let mut evicted = None;
        while self.samples.len() >= self.capacity {
            evicted = self.samples.pop_front();
        }
        // len < capacity <= HISTORY_CAPACITY_MAX, so this cannot overflow.
        let _ = self.samples.push_back(sample);
        evicted
    }

    /// Point-in-time copy, oldest first.
    pub fn snapshot(&self) -> Snapshot {
        self.samples.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY_MAX)
    }
}
