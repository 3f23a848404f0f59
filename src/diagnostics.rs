//! Runtime diagnostics.
//!
//! [`CycleStats`] counts how every cycle ended.  The session logs the
//! totals at shutdown and ships them to the sink in
//! [`AppEvent::Closed`](crate::app::events::AppEvent::Closed).

use serde::Serialize;

/// Stage of a cycle at which it was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    /// Reading the sensor payload from link A.
    Receive,
    /// Turning the payload into a reading.
    Decode,
    /// Writing the command to link B.
    Send,
    /// Reading the acknowledgment from link B.
    Ack,
}

impl CycleStage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Receive => "receive",
            Self::Decode => "decode",
            Self::Send => "send",
            Self::Ack => "ack",
        }
    }
}

/// Per-session cycle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleStats {
    pub completed: u64,
    pub receive_failures: u64,
    pub decode_failures: u64,
    pub send_failures: u64,
    pub ack_failures: u64,
}

impl CycleStats {
    pub fn record_completed(&mut self) {
        self.completed += 1;
    }

    pub fn record_failure(&mut self, stage: CycleStage) {
        let counter = match stage {
            CycleStage::Receive => &mut self.receive_failures,
            CycleStage::Decode => &mut self.decode_failures,
            CycleStage::Send => &mut self.send_failures,
            CycleStage::Ack => &mut self.ack_failures,
        };
        *counter += 1;
    }

    pub fn failures(&self) -> u64 {
        self.receive_failures + self.decode_failures + self.send_failures + self.ack_failures
    }

    /// Cycles attempted (completed or abandoned).
    pub fn attempted(&self) -> u64 {
        self.completed + self.failures()
    }
}
