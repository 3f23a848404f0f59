//! Session lifecycle state machine.
//!
//! ```text
//!  ┌──────────────────────┐  both links   ┌─────────┐
//!  │ AwaitingConnections  │──────────────▶│ Running │◀─┐ one cycle
//!  └──────────────────────┘               └─────────┘──┘
//!             │ shutdown                       │ shutdown
//!             ▼                                ▼
//!        ┌──────────────┐   links closed  ┌────────┐
//!        │ ShuttingDown │────────────────▶│ Closed │
//!        └──────────────┘                 └────────┘
//! ```
//!
//! Only the edges above are legal.  Anything else is logged and ignored,
//! so a late or duplicated shutdown request can never resurrect a closed
//! session.

use core::fmt;

use log::{info, warn};
use serde::Serialize;

/// Every state a session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingConnections,
    Running,
    ShuttingDown,
    Closed,
}

impl SessionState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::AwaitingConnections => "AWAITING_CONNECTIONS",
            Self::Running => "RUNNING",
            Self::ShuttingDown => "SHUTTING_DOWN",
            Self::Closed => "CLOSED",
        }
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::AwaitingConnections, Self::Running)
                | (Self::AwaitingConnections, Self::ShuttingDown)
                | (Self::Running, Self::ShuttingDown)
                | (Self::ShuttingDown, Self::Closed)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Guarded holder of the current [`SessionState`].
#[derive(Debug)]
pub struct SessionFsm {
    current: SessionState,
    transitions: u32,
}

impl SessionFsm {
    pub fn new() -> Self {
        Self {
            current: SessionState::AwaitingConnections,
            transitions: 0,
        }
    }

    /// Move to `next` if the edge is legal.  Returns `false` (and stays
    /// put) otherwise.
    pub fn transition(&mut self, next: SessionState) -> bool {
        if !self.current.can_transition(next) {
            warn!("FSM rejected transition: {} -> {}", self.current, next);
            return false;
        }
        info!("FSM transition: {} -> {}", self.current, next);
        self.current = next;
        self.transitions += 1;
        true
    }

    pub fn current_state(&self) -> SessionState {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.current == SessionState::Running
    }

    /// Walk to `CLOSED` by way of `SHUTTING_DOWN`, from any state.
    /// Idempotent.
    pub fn shut_down(&mut self) {
        if self.current.is_terminal() {
            return;
        }
        if self.current != SessionState::ShuttingDown {
            self.transition(SessionState::ShuttingDown);
        }
        self.transition(SessionState::Closed);
    }

    /// Number of accepted transitions since construction.
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }
}

impl Default for SessionFsm {
    fn default() -> Self {
        Self::new()
    }
}
