//! Threshold control policy.
//!
//! Two independent rules evaluated against the same temperature:
//!
//! ```text
//!   fan    = ON   if T >  threshold  else OFF
//!   window = OPEN if T <  threshold  else CLOSE
//! ```
//!
//! At exactly the threshold the fan is OFF and the window is CLOSED.
//! The CO threshold is carried for display but does not gate either rule.

use super::{ActuatorCommand, FanCommand, Reading, WindowCommand};
use crate::config::BridgeConfig;

/// Stateless threshold policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPolicy {
    temp_threshold: f64,
    co_threshold: f64,
}

impl ControlPolicy {
    pub fn new(temp_threshold: f64, co_threshold: f64) -> Self {
        Self {
            temp_threshold,
            co_threshold,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.temp_threshold, config.co_threshold)
    }

    /// Map a reading to the command pair.  Pure: no state, no side effects.
    pub fn decide(&self, reading: &Reading) -> ActuatorCommand {
        let t = reading.temperature;
        let fan = if t > self.temp_threshold {
            FanCommand::On
        } else {
            FanCommand::Off
        };
        let window = if t < self.temp_threshold {
            WindowCommand::Open
        } else {
            WindowCommand::Close
        };
        ActuatorCommand { fan, window }
    }

    pub fn temp_threshold(&self) -> f64 {
        self.temp_threshold
    }

    /// Reserved: not consulted by [`decide`](Self::decide).
    pub fn co_threshold(&self) -> f64 {
        self.co_threshold
    }
}

impl Default for ControlPolicy {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}
