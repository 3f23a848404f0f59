//! Session manager — drives the receive → decide → send → ack cycle.
//!
//! ```text
//!   ┌─────────────── one cycle ────────────────────────────────┐
//!   │ 1 read A ─▶ 2 decode ─▶ 3 decide ─▶ 4 append history      │
//!   │          ─▶ 5 send B ─▶ 6 read ack B ─▶ 7 emit Update     │
//!   └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure abandons the rest of its cycle, is logged with its stage
//! and link, and the loop carries on with the next read.  Only a shutdown
//! request ends the loop; links are closed on the way out, whatever state
//! they are in.

use std::io;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, TimePort};
use crate::app::service::BridgeService;
use crate::config::BridgeConfig;
use crate::diagnostics::{CycleStage, CycleStats};
use crate::error::{Error, Link, Result};
use crate::fsm::{SessionFsm, SessionState};
use crate::history::HistoryBuffer;
use crate::link::codec;
use crate::link::transport::{Transport, is_timeout};
use crate::shutdown::ShutdownSignal;

/// How a cycle that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Command sent, acknowledgment received, update emitted.
    Completed,
    /// Link A read timed out or was interrupted; nothing happened.
    Idle,
}

/// Stage at which `err` abandoned a cycle.
pub fn failed_stage(err: &Error) -> CycleStage {
    match err {
        Error::Decode(_) => CycleStage::Decode,
        Error::Send(..) => CycleStage::Send,
        Error::Receive(Link::Actuator, _) => CycleStage::Ack,
        _ => CycleStage::Receive,
    }
}

/// One bridge session: two live links, the domain core, and the
/// lifecycle state.
pub struct Session<A: Transport, B: Transport, T: TimePort> {
    sensor: A,
    actuator: B,
    clock: T,
    service: BridgeService,
    fsm: SessionFsm,
    shutdown: ShutdownSignal,
    read_buf: Vec<u8>,
    failure_backoff: Duration,
}

impl<A: Transport, B: Transport, T: TimePort> Session<A, B, T> {
    /// Build a session over two established links.  The session enters
    /// `RUNNING` immediately; `clock` should start now.
    pub fn new(
        sensor: A,
        actuator: B,
        clock: T,
        config: &BridgeConfig,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self::with_fsm(sensor, actuator, clock, config, shutdown, SessionFsm::new())
    }

    /// Like [`new`](Self::new), continuing a lifecycle that was
    /// `AWAITING_CONNECTIONS` while the links were accepted.  A lifecycle
    /// in any other state is kept as is and the session runs no cycles.
    pub fn with_fsm(
        sensor: A,
        actuator: B,
        clock: T,
        config: &BridgeConfig,
        shutdown: ShutdownSignal,
        mut fsm: SessionFsm,
    ) -> Self {
        fsm.transition(SessionState::Running);
        Self {
            sensor,
            actuator,
            clock,
            service: BridgeService::new(config),
            fsm,
            shutdown,
            read_buf: vec![0; config.read_buffer_size],
            failure_backoff: Duration::from_millis(config.failure_backoff_ms),
        }
    }

    // ── Loop ──────────────────────────────────────────────────

    /// Run cycles until shutdown is requested, then close both links.
    /// Returns the final counters.
    pub fn run(&mut self, sink: &mut impl EventSink) -> CycleStats {
        if self.fsm.is_running() {
            info!(
                "Session running: {} = {}, {} = {}, temp threshold {}",
                Link::Sensor,
                self.sensor.peer(),
                Link::Actuator,
                self.actuator.peer(),
                self.service.policy().temp_threshold()
            );
            sink.emit(&AppEvent::Started {
                sensor_peer: self.sensor.peer(),
                actuator_peer: self.actuator.peer(),
                history_capacity: self.service.history().capacity(),
            });
        }

        while self.fsm.is_running() && !self.shutdown.is_requested() {
            match self.run_cycle(sink) {
                Ok(_) => {}
                Err(e) => {
                    if self.shutdown.is_requested() {
                        debug!("Cycle interrupted by shutdown: {}", e);
                        break;
                    }
                    let stage = self.report_failure(&e, sink);
                    if stage != CycleStage::Decode && self.shutdown.sleep(self.failure_backoff) {
                        break;
                    }
                }
            }
        }

        self.close();
        let stats = self.service.stats();
        info!(
            "Session closed: {} cycles completed, {} abandoned",
            stats.completed,
            stats.failures()
        );
        sink.emit(&AppEvent::Closed(stats));
        stats
    }

    /// Execute exactly one cycle.
    pub fn run_cycle(&mut self, sink: &mut impl EventSink) -> Result<CycleOutcome> {
        // 1. Sensor payload
        let n = match self.sensor.read(&mut self.read_buf) {
            Ok(0) => return Err(Error::peer_closed(Link::Sensor)),
            Ok(n) => n,
            Err(e) if is_timeout(&e) || e.kind() == io::ErrorKind::Interrupted => {
                return Ok(CycleOutcome::Idle);
            }
            Err(e) => return Err(Error::Receive(Link::Sensor, e)),
        };
        let elapsed = self.clock.elapsed();
        info!(
            "Received from {}: {}",
            Link::Sensor,
            String::from_utf8_lossy(&self.read_buf[..n]).trim()
        );

        // 2–4. Decode, decide, record
        let decision = self.service.ingest(&self.read_buf[..n], elapsed)?;

        // 5. Command
        let wire = codec::encode_command(&decision.command);
        self.actuator
            .write_all(&wire)
            .map_err(|e| Error::Send(Link::Actuator, e))?;
        info!("Sent to {}: {}", Link::Actuator, decision.command);

        // 6. Acknowledgment
        let m = self
            .actuator
            .read(&mut self.read_buf)
            .map_err(|e| Error::Receive(Link::Actuator, e))?;
        if m == 0 {
            if self.shutdown.is_requested() {
                // Cut short by shutdown: not an acknowledgment.
                return Err(Error::peer_closed(Link::Actuator));
            }
            warn!("{} returned an empty acknowledgment (peer closed?)", Link::Actuator);
        }
        let ack = codec::decode_ack(&self.read_buf[..m]);
        info!("{} response: {}", Link::Actuator, ack);

        // 7. Telemetry
        let update = self.service.complete(&decision, ack);
        sink.emit(&AppEvent::Update(update));
        Ok(CycleOutcome::Completed)
    }

    /// Log, count and publish a failed cycle.
    fn report_failure(&mut self, err: &Error, sink: &mut impl EventSink) -> CycleStage {
        let stage = failed_stage(err);
        self.service.record_failure(stage);
        match stage {
            CycleStage::Decode => warn!("CYCLE | {} failed on {}: {}", stage.name(), Link::Sensor, err),
            _ => error!("CYCLE | {} failed: {}", stage.name(), err),
        }
        sink.emit(&AppEvent::CycleFailed {
            stage,
            link: err.link().unwrap_or(Link::Sensor),
            reason: err.to_string(),
        });
        stage
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Close both links.  Idempotent; close errors are ignored.
    pub fn close(&mut self) {
        if self.fsm.current_state().is_terminal() {
            return;
        }
        self.fsm.transition(SessionState::ShuttingDown);
        self.sensor.close();
        self.actuator.close();
        self.shutdown.release();
        self.fsm.shut_down();
        debug!(
            "Session lifecycle ended after {} transition(s)",
            self.fsm.transition_count()
        );
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.fsm.current_state()
    }

    pub fn history(&self) -> &HistoryBuffer {
        self.service.history()
    }

    pub fn stats(&self) -> CycleStats {
        self.service.stats()
    }
}

impl<A: Transport, B: Transport, T: TimePort> Drop for Session<A, B, T> {
    fn drop(&mut self) {
        self.close();
    }
}
