//! Device links — everything that touches the two TCP connections.
//!
//! ```text
//! ┌──────────┐  "t,c"   ┌───────────┐  Reading  ┌──────────────┐
//! │ Link A   │────────▶│   codec   │─────────▶│   Session    │
//! │ (sensor) │          └───────────┘           │              │
//! └──────────┘                                  │              │
//! ┌──────────┐  "FAN;WINDOW" / ack              │              │
//! │ Link B   │◀───────────────────────────────▶│              │
//! │(actuator)│                                  └──────────────┘
//! └──────────┘
//! ```
//!
//! [`acceptor`] establishes the links, [`transport`] is the byte-stream
//! seam the session is generic over, [`codec`] turns bytes into domain
//! values and back.

pub mod acceptor;
pub mod codec;
pub mod transport;
