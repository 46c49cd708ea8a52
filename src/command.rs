//! Single-byte serial commands
//!
//! | Byte | Reply |
//! |---|---|
//! | `A` / `a` | `ADC value = <average>` |
//! | `V` / `v` | `ADC value = <mv> mV` |
//!
//! Any other byte is ignored.

use crate::message::{self, Message};
use crate::sample::Average;

/// A decoded command byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Report the average in raw counts
    Raw,
    /// Report the average in millivolts
    Millivolts,
}

impl Command {
    /// Decode a received byte, case-insensitively. Returns `None` for bytes that aren't commands.
    #[inline]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte.to_ascii_uppercase() {
            b'A' => Some(Command::Raw),
            b'V' => Some(Command::Millivolts),
            _ => None,
        }
    }

    /// The reply to this command for the given average.
    pub fn reply(self, average: Average, vref_mv: u32) -> Message {
        match self {
            Command::Raw => message::raw_reading(average),
            Command::Millivolts => message::millivolt_reading(average.millivolts(vref_mv)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_is_case_insensitive() {
        assert_eq!(Command::from_byte(b'A'), Some(Command::Raw));
        assert_eq!(Command::from_byte(b'a'), Some(Command::Raw));
        assert_eq!(Command::from_byte(b'V'), Some(Command::Millivolts));
        assert_eq!(Command::from_byte(b'v'), Some(Command::Millivolts));
    }

    #[test]
    fn other_bytes_are_ignored() {
        for byte in [b'b', b'B', b'\r', b'\n', b' ', 0x00, 0xC1, 0xE1, 0xFF] {
            assert_eq!(Command::from_byte(byte), None);
        }
    }

    #[test]
    fn replies_at_half_scale() {
        let average = Average::new(512);
        assert_eq!(Command::Raw.reply(average, 5000).as_str(), "ADC value = 512");
        assert_eq!(
            Command::Millivolts.reply(average, 5000).as_str(),
            "ADC value = 2500 mV"
        );
    }
}
