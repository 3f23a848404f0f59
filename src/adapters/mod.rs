//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                   |
//! |----------------|--------------------|-------------------------------|
//! | `log_sink`     | EventSink          | `log` facade (stderr)         |
//! | `json_sink`    | EventSink          | Any `io::Write`, JSON lines   |
//! | `channel_sink` | EventSink          | Bounded channel + sink thread |
//! | `config_file`  | ConfigPort         | JSON file on disk             |
//! | `time`         | TimePort           | `std::time::Instant`          |

pub mod channel_sink;
pub mod config_file;
pub mod json_sink;
pub mod log_sink;
pub mod time;
