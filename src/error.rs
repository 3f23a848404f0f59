//! Unified error types for the bridge.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! session loop's error handling uniform.  Startup failures (`Bind`,
//! `Accept`, `Config`) abort the process; everything else is scoped to
//! one cycle and only logged.

use core::fmt;
use std::io;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Link identity
// ---------------------------------------------------------------------------

/// Which of the two device connections an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    /// Connection A: the sensor device sending `temperature,co_level`.
    Sensor,
    /// Connection B: the actuator device receiving `FAN;WINDOW`.
    Actuator,
}

impl Link {
    /// Short tag used in log lines.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Sensor => "A",
            Self::Actuator => "B",
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor => write!(f, "link A (sensor)"),
            Self::Actuator => write!(f, "link B (actuator)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the bridge funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The listening endpoint for a link could not be bound.
    Bind(Link, io::Error),
    /// The listener failed while waiting for the device to connect.
    Accept(Link, io::Error),
    /// A sensor payload could not be decoded into a reading.
    Decode(DecodeError),
    /// Writing to a link failed or delivered only part of the payload.
    Send(Link, io::Error),
    /// Reading from a link failed; a peer close is `UnexpectedEof`.
    Receive(Link, io::Error),
    /// Configuration is invalid.
    Config(&'static str),
}

impl Error {
    /// Startup errors end the process; cycle errors never do.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Bind(..) | Self::Accept(..) | Self::Config(_))
    }

    /// Error for a zero-byte read, i.e. the peer closed its side.
    pub fn peer_closed(link: Link) -> Self {
        Self::Receive(
            link,
            io::Error::new(io::ErrorKind::UnexpectedEof, "peer closed connection"),
        )
    }

    /// The link this error is attributed to, if any.
    pub fn link(&self) -> Option<Link> {
        match self {
            Self::Bind(l, _) | Self::Accept(l, _) | Self::Send(l, _) | Self::Receive(l, _) => {
                Some(*l)
            }
            Self::Decode(_) => Some(Link::Sensor),
            Self::Config(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(link, e) => write!(f, "bind {link}: {e}"),
            Self::Accept(link, e) => write!(f, "accept {link}: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Send(link, e) => write!(f, "send on {link}: {e}"),
            Self::Receive(link, e) => write!(f, "receive on {link}: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(_, e) | Self::Accept(_, e) | Self::Send(_, e) | Self::Receive(_, e) => {
                Some(e)
            }
            Self::Decode(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Field of a sensor record, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    CoLevel,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::CoLevel => write!(f, "co_level"),
        }
    }
}

/// Why a sensor payload was rejected.  A rejected payload discards the
/// whole cycle; there is no partial reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Nothing but whitespace was received.
    Empty,
    /// The payload is not valid UTF-8.
    NotUtf8,
    /// The payload did not split into exactly two comma-separated fields.
    FieldCount(usize),
    /// A field is not a number.
    InvalidNumber(Field),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty payload"),
            Self::NotUtf8 => write!(f, "payload is not UTF-8"),
            Self::FieldCount(n) => write!(f, "expected 2 fields, got {n}"),
            Self::InvalidNumber(field) => write!(f, "{field} is not a number"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
