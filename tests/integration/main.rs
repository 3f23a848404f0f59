//! Integration test driver for `tests/integration/` submodule.
//!
//! `session_tests` drives whole sessions over scripted in-memory links;
//! `tcp_tests` runs the same scenarios over real loopback sockets.

mod mock_link;
mod tcp_tests;
