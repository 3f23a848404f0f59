//! JSON-lines event sink.
//!
//! Writes each [`AppEvent`] as one JSON object per line, e.g.
//!
//! ```text
//! {"event":"update","sample":{"timestamp":1.02,...},"command":{"fan":"On","window":"Close"},...}
//! ```
//!
//! Meant to be piped into an external plotter.  A write failure is logged
//! once and further output is dropped; it never reaches the session.

use std::io::Write;

use log::error;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct JsonLinesSink<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    /// `true` once a write has failed and output was abandoned.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &AppEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        if self.failed {
            return;
        }
        if let Err(e) = self.write_event(event) {
            error!("JSON sink: write failed, dropping further events: {}", e);
            self.failed = true;
        }
    }
}
