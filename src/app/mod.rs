//! Application core — pure cycle logic, zero I/O.
//!
//! [`service::BridgeService`] turns a raw sensor payload into a command
//! and a history sample.  Everything that talks to the outside world
//! (links, sinks, config files, clocks) goes through the **port traits**
//! in [`ports`], so the core is testable without sockets.

pub mod events;
pub mod ports;
pub mod service;
