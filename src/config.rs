//! Bridge configuration parameters
//!
//! All tunable parameters for the bridge.  Defaults match the deployed
//! device pair; values can be overridden from a JSON file
//! ([`JsonConfigStore`](crate::adapters::config_file::JsonConfigStore))
//! and then from the command line.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::HISTORY_CAPACITY_MAX;

/// Largest single read the codec accepts from either link.
pub const READ_BUFFER_MAX: usize = 4096;

/// Core bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    // --- Network ---
    /// Host both listeners bind to
    pub server_address: String,
    /// Port for link A (sensor device)
    pub port_a: u16,
    /// Port for link B (actuator device)
    pub port_b: u16,
    /// Maximum bytes taken from a link per receive call
    pub read_buffer_size: usize,
    /// Optional read timeout (milliseconds); `None` blocks until data or peer close
    pub read_timeout_ms: Option<u64>,

    // --- Control thresholds ---
    /// Temperature (°C) the fan and window rules compare against
    pub temp_threshold: f64,
    /// CO level threshold; recorded but not used by the control policy
    pub co_threshold: f64,

    // --- History / display ---
    /// Number of samples kept in the sliding window
    pub history_capacity: usize,
    /// Width of the display window (seconds)
    pub display_window_secs: f64,
    /// Padding after the newest sample on the time axis (seconds)
    pub display_margin_secs: f64,

    // --- Hardening ---
    /// Pause after a cycle fails on I/O (milliseconds)
    pub failure_backoff_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            // Network
            server_address: "localhost".to_string(),
            port_a: 4444,
            port_b: 5555,
            read_buffer_size: 1024,
            read_timeout_ms: None,

            // Thresholds
            temp_threshold: 38.0,
            co_threshold: 20.0,

            // History
            history_capacity: HISTORY_CAPACITY_MAX,
            display_window_secs: 60.0,
            display_margin_secs: 2.0,

            // Hardening
            failure_backoff_ms: 100,
        }
    }
}

impl BridgeConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<()> {
        if self.server_address.trim().is_empty() {
            return Err(Error::Config("server_address must not be empty"));
        }
        if self.port_a == self.port_b && self.port_a != 0 {
            return Err(Error::Config("port_a and port_b must differ"));
        }
        if self.read_buffer_size == 0 || self.read_buffer_size > READ_BUFFER_MAX {
            return Err(Error::Config("read_buffer_size must be within 1..=4096"));
        }
        if self.read_timeout_ms == Some(0) {
            return Err(Error::Config("read_timeout_ms must be positive when set"));
        }
        if !self.temp_threshold.is_finite() || !self.co_threshold.is_finite() {
            return Err(Error::Config("thresholds must be finite"));
        }
        if self.history_capacity == 0 || self.history_capacity > HISTORY_CAPACITY_MAX {
            return Err(Error::Config("history_capacity must be within 1..=100"));
        }
        let window = self.display_window_secs;
        if !(window.is_finite() && window > 0.0) || !self.display_margin_secs.is_finite() {
            return Err(Error::Config("display window must be positive and finite"));
        }
        Ok(())
    }

    /// `host:port` for link A.
    pub fn address_a(&self) -> String {
        format!("{}:{}", self.server_address, self.port_a)
    }

    /// `host:port` for link B.
    pub fn address_b(&self) -> String {
        format!("{}:{}", self.server_address, self.port_b)
    }
}
