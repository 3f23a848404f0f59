//! Port traits — the hexagonal boundary between the core and the outside.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BridgeService / Session
//! ```
//!
//! Driven adapters (telemetry sinks, config storage, clocks) implement
//! these traits.  Device links have their own seam in
//! [`link::transport`](crate::link::transport).

use core::time::Duration;

use crate::config::BridgeConfig;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / plotting)
// ───────────────────────────────────────────────────────────────

/// The session emits [`AppEvent`](super::events::AppEvent)s through this
/// port, in order.  Adapters decide where they go (log, JSON stream,
/// another thread).  Implementations must not block for long: the
/// session loop waits for `emit` to return.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: &super::events::AppEvent) {
        (**self).emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ config storage)
// ───────────────────────────────────────────────────────────────

/// Loads and persists bridge configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`ConfigError::ValidationFailed`], not clamp them.
pub trait ConfigPort {
    /// Load configuration.  [`ConfigError::NotFound`] if nothing is stored.
    fn load(&self) -> Result<BridgeConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &BridgeConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since the session started.
pub trait TimePort {
    fn elapsed(&self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config stored.
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
