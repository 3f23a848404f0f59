//! Ventlink bridge library.
//!
//! Accepts one sensor device and one actuator device over TCP, turns each
//! `temperature,co_level` reading into a `FAN;WINDOW` command, and keeps a
//! sliding window of samples for telemetry consumers.  The binary in
//! `main.rs` wires these modules to real sockets; tests drive them with
//! in-memory links.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod fsm;
pub mod history;
pub mod link;
pub mod session;
pub mod shutdown;
