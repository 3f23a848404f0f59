//! Bridge service — the hexagonal core of one cycle.
//!
//! [`BridgeService`] owns the control policy, the history window and the
//! cycle counters.  It never touches a socket: the session hands it the
//! bytes read from link A and gets back the command to send to link B.
//!
//! ```text
//!  payload ──▶ ┌──────────────────────────────┐ ──▶ Decision (command)
//!              │        BridgeService         │
//!  ack ──────▶ │ codec · policy · history     │ ──▶ TelemetryUpdate
//!              └──────────────────────────────┘
//! ```

use core::time::Duration;

use log::{debug, info};

use crate::config::BridgeConfig;
use crate::control::policy::ControlPolicy;
use crate::control::{ActuatorCommand, Reading};
use crate::diagnostics::{CycleStage, CycleStats};
use crate::error::DecodeError;
use crate::history::{DisplayWindow, HistoryBuffer, Sample};
use crate::link::codec;

use super::events::TelemetryUpdate;

/// Outcome of the decide half of a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub reading: Reading,
    pub command: ActuatorCommand,
    /// Sample already appended to the history.
    pub sample: Sample,
}

/// The bridge service owns all per-session domain state.
pub struct BridgeService {
    policy: ControlPolicy,
    history: HistoryBuffer,
    stats: CycleStats,
    display_span_secs: f64,
    display_margin_secs: f64,
}

impl BridgeService {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            policy: ControlPolicy::from_config(config),
            history: HistoryBuffer::new(config.history_capacity),
            stats: CycleStats::default(),
            display_span_secs: config.display_window_secs,
            display_margin_secs: config.display_margin_secs,
        }
    }

    /// Decode a sensor payload, decide the command and record the sample.
    ///
    /// On a decode failure nothing is recorded; the caller counts it.
    pub fn ingest(&mut self, payload: &[u8], elapsed: Duration) -> Result<Decision, DecodeError> {
        let reading = codec::decode_reading(payload, elapsed)?;
        info!(
            "Parsed temperature={} co_level={}",
            reading.temperature, reading.co_level
        );

        let command = self.policy.decide(&reading);
        let sample = Sample::new(&reading, &command);
        if let Some(evicted) = self.history.append(sample) {
            debug!("History full, evicted sample t={:.3}s", evicted.timestamp);
        }

        Ok(Decision {
            reading,
            command,
            sample,
        })
    }

    /// Close out a cycle whose command was acknowledged.
    pub fn complete(&mut self, decision: &Decision, ack: String) -> TelemetryUpdate {
        self.stats.record_completed();
        let history = self.history.snapshot();
        let window = DisplayWindow::compute(&history, self.display_span_secs, self.display_margin_secs)
            .unwrap_or_else(|| {
                DisplayWindow::around(
                    &decision.sample,
                    self.display_span_secs,
                    self.display_margin_secs,
                )
            });
        TelemetryUpdate {
            sample: decision.sample,
            command: decision.command,
            ack,
            history,
            window,
        }
    }

    /// Count a cycle abandoned at `stage`.
    pub fn record_failure(&mut self, stage: CycleStage) {
        self.stats.record_failure(stage);
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    pub fn policy(&self) -> &ControlPolicy {
        &self.policy
    }
}
