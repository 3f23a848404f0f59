//! Mock links, clock and sink for integration tests.
//!
//! A [`ScriptedLink`] replays a fixed list of reads and records every
//! write and close into a shared [`LinkLog`], so tests can inspect a link
//! after the session has taken ownership of it.

use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ventlink::app::events::{AppEvent, TelemetryUpdate};
use ventlink::app::ports::{EventSink, TimePort};
use ventlink::link::transport::Transport;
use ventlink::shutdown::ShutdownSignal;

// ── Link log ──────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LinkLog {
    pub writes: Vec<String>,
    pub closes: u32,
}

#[derive(Clone, Default)]
pub struct LinkProbe(Arc<Mutex<LinkLog>>);

#[allow(dead_code)]
impl LinkProbe {
    pub fn writes(&self) -> Vec<String> {
        self.0.lock().unwrap().writes.clone()
    }

    pub fn closes(&self) -> u32 {
        self.0.lock().unwrap().closes
    }
}

// ── ScriptedLink ──────────────────────────────────────────────

pub enum Step {
    Data(&'static str),
    Fail(io::ErrorKind),
}

pub struct ScriptedLink {
    reads: VecDeque<Step>,
    failing_writes: usize,
    log: LinkProbe,
    /// Triggered when the read script runs out.
    on_exhausted: Option<ShutdownSignal>,
}

#[allow(dead_code)]
impl ScriptedLink {
    pub fn new(reads: impl IntoIterator<Item = Step>) -> (Self, LinkProbe) {
        let log = LinkProbe::default();
        let link = Self {
            reads: reads.into_iter().collect(),
            failing_writes: 0,
            log: log.clone(),
            on_exhausted: None,
        };
        (link, log)
    }

    /// Convenience: every read succeeds with the given text.
    pub fn with_data(reads: &[&'static str]) -> (Self, LinkProbe) {
        Self::new(reads.iter().copied().map(Step::Data))
    }

    /// Fail the first `n` writes with `BrokenPipe`.
    pub fn failing_writes(mut self, n: usize) -> Self {
        self.failing_writes = n;
        self
    }

    /// Request shutdown once the script is exhausted, like a socket being
    /// shut down underneath a pending read.
    pub fn stop_when_exhausted(mut self, signal: ShutdownSignal) -> Self {
        self.on_exhausted = Some(signal);
        self
    }
}

impl Transport for ScriptedLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            Some(Step::Data(text)) => {
                let n = text.len().min(buf.len());
                buf[..n].copy_from_slice(&text.as_bytes()[..n]);
                Ok(n)
            }
            Some(Step::Fail(kind)) => Err(io::Error::from(kind)),
            None => {
                if let Some(signal) = &self.on_exhausted {
                    signal.trigger();
                }
                Ok(0)
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.log
            .0
            .lock()
            .unwrap()
            .writes
            .push(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn close(&mut self) {
        self.log.0.lock().unwrap().closes += 1;
    }

    fn peer(&self) -> String {
        "scripted".to_string()
    }
}

// ── SteppingClock ─────────────────────────────────────────────

/// Advances one second on every query, starting at 1s.
#[derive(Default)]
pub struct SteppingClock {
    ticks: Cell<u64>,
}

impl TimePort for SteppingClock {
    fn elapsed(&self) -> Duration {
        let next = self.ticks.get() + 1;
        self.ticks.set(next);
        Duration::from_secs(next)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn updates(&self) -> Vec<&TelemetryUpdate> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Update(u) => Some(u),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
