//! Control domain — readings in, actuator commands out.
//!
//! [`Reading`] is what the sensor device reports; [`ActuatorCommand`] is
//! what the actuator device is told to do.  The mapping between them
//! lives in [`policy`] and is a pure function of the reading.

pub mod policy;

use core::fmt;
use core::time::Duration;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Reading (decoded sensor record)
// ---------------------------------------------------------------------------

/// One decoded sensor record.  Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Temperature (°C).
    pub temperature: f64,
    /// Carbon-monoxide level (sensor units).
    pub co_level: f64,
    /// Time since session start at which the payload arrived.
    pub received_at: Duration,
}

// ---------------------------------------------------------------------------
// Actuator command
// ---------------------------------------------------------------------------

/// Fan relay command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FanCommand {
    On,
    Off,
}

impl FanCommand {
    /// Wire token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// 1 = running, 0 = stopped (plotted as a step channel).
    pub const fn state_bit(self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }
}

/// Window actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WindowCommand {
    Open,
    Close,
}

impl WindowCommand {
    /// Wire token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
        }
    }

    /// 1 = open, 0 = closed.
    pub const fn state_bit(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Close => 0,
        }
    }
}

/// Command pair sent to the actuator device once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActuatorCommand {
    pub fan: FanCommand,
    pub window: WindowCommand,
}

/// Renders the wire form `FAN;WINDOW`.
impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.fan.as_str(), self.window.as_str())
    }
}
