//! Outbound application events.
//!
//! The session emits these through the
//! [`EventSink`](super::ports::EventSink) port, one `Update` per completed
//! cycle.  Every event is self-contained: an `Update` carries a copy of
//! the whole history window, so a consumer never needs to look at the
//! session's state.

use serde::Serialize;

use crate::control::ActuatorCommand;
use crate::diagnostics::{CycleStage, CycleStats};
use crate::error::Link;
use crate::history::{DisplayWindow, Sample, Snapshot};

/// Structured events emitted by the session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Both links are up and the cycle loop is starting.
    Started {
        sensor_peer: String,
        actuator_peer: String,
        history_capacity: usize,
    },

    /// A cycle completed: command sent and acknowledged.
    Update(TelemetryUpdate),

    /// A cycle was abandoned.
    CycleFailed {
        stage: CycleStage,
        link: Link,
        reason: String,
    },

    /// The session is closed; no further events follow.
    Closed(CycleStats),
}

/// One completed cycle, as a plotter needs it.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryUpdate {
    /// The sample appended this cycle.
    pub sample: Sample,
    /// Command sent to the actuator device.
    pub command: ActuatorCommand,
    /// Acknowledgment text from the actuator device.
    pub ack: String,
    /// Whole window after the append, oldest first.
    pub history: Snapshot,
    /// Suggested axis bounds for `history`.
    pub window: DisplayWindow,
}
