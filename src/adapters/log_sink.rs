//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per
//! application event to the `log` facade.  This is the default telemetry
//! consumer when no plotter is attached.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::history::STATE_AXIS;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Update(u) => {
                info!(
                    "TELEM | t={:.2}s | T={:.1}\u{00b0}C | CO={:.1} | fan={} window={} | \
                     cmd={} ack={:?} | n={} | x=[{:.1}, {:.1}] y=[{:.1}, {:.1}] state=[{}, {}]",
                    u.sample.timestamp,
                    u.sample.temperature,
                    u.sample.co_level,
                    u.sample.fan_state,
                    u.sample.window_state,
                    u.command,
                    u.ack,
                    u.history.len(),
                    u.window.x_min,
                    u.window.x_max,
                    u.window.y_min,
                    u.window.y_max,
                    STATE_AXIS.0,
                    STATE_AXIS.1,
                );
            }
            AppEvent::CycleFailed {
                stage,
                link,
                reason,
            } => {
                warn!("FAIL  | stage={} link={} | {}", stage.name(), link.tag(), reason);
            }
            AppEvent::Started {
                sensor_peer,
                actuator_peer,
                history_capacity,
            } => {
                info!(
                    "START | A={} B={} | history={}",
                    sensor_peer, actuator_peer, history_capacity
                );
            }
            AppEvent::Closed(stats) => {
                info!(
                    "CLOSE | completed={} receive={} decode={} send={} ack={}",
                    stats.completed,
                    stats.receive_failures,
                    stats.decode_failures,
                    stats.send_failures,
                    stats.ack_failures,
                );
            }
        }
    }
}
