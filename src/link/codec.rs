//! Text record codec.
//!
//! Wire format, one record per receive call:
//! ```text
//! A → bridge   "<temperature>,<co_level>"   (surrounding whitespace ignored)
//! bridge → B   "<ON|OFF>;<OPEN|CLOSE>"      (no trailing delimiter)
//! B → bridge   free text acknowledgment
//! ```
//!
//! There is no framing: whatever a single bounded read returns is treated
//! as one record.  Two records coalesced into one read, or one record split
//! across two reads, both fail to decode and cost the cycle.

use core::time::Duration;

use crate::control::{ActuatorCommand, Reading};
use crate::error::{DecodeError, Field};

/// Decode one sensor payload.
///
/// Exactly two comma-separated numeric fields are required.  Anything
/// else rejects the whole payload.
pub fn decode_reading(payload: &[u8], received_at: Duration) -> Result<Reading, DecodeError> {
    let text = core::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut fields = text.split(',');
    let (Some(temp), Some(co), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(DecodeError::FieldCount(text.split(',').count()));
    };

    Ok(Reading {
        temperature: parse_field(temp, Field::Temperature)?,
        co_level: parse_field(co, Field::CoLevel)?,
        received_at,
    })
}

fn parse_field(raw: &str, field: Field) -> Result<f64, DecodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| DecodeError::InvalidNumber(field))
}

/// Encode a command pair as `FAN;WINDOW`.  Total: every command encodes.
pub fn encode_command(command: &ActuatorCommand) -> Vec<u8> {
    command.to_string().into_bytes()
}

/// Acknowledgment text for logging.  Invalid UTF-8 is replaced, an empty
/// payload is an empty string.
pub fn decode_ack(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}
