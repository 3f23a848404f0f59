//! Fuzz target: `decode_reading` → `ControlPolicy::decide` → `HistoryBuffer`
//!
//! Drives arbitrary sensor payloads through one bridge cycle minus the
//! sockets and asserts that decoding never panics, that every decoded
//! reading yields a well-formed command, and that the history window
//! never exceeds its capacity.
//!
//! cargo fuzz run fuzz_reading_decoder

#![no_main]

use core::time::Duration;

use libfuzzer_sys::fuzz_target;
use ventlink::control::policy::ControlPolicy;
use ventlink::history::{HistoryBuffer, Sample};
use ventlink::link::codec::{decode_ack, decode_reading, encode_command};

fuzz_target!(|data: &[u8]| {
    let policy = ControlPolicy::default();
    let mut history = HistoryBuffer::new(4);

    // Each newline-separated chunk stands in for one receive call.
    for (i, chunk) in data.split(|&b| b == b'\n').enumerate() {
        let _ = decode_ack(chunk);
        let Ok(reading) = decode_reading(chunk, Duration::from_millis(i as u64)) else {
            continue;
        };
        let command = policy.decide(&reading);

        let wire = encode_command(&command);
        assert!(matches!(
            wire.as_slice(),
            b"ON;CLOSE" | b"OFF;OPEN" | b"OFF;CLOSE"
        ));

        history.append(Sample::new(&reading, &command));
        assert!(history.len() <= history.capacity());
    }
});
