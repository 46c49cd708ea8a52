//! Fixed-format text messages
//!
//! Three messages exist:
//!
//! | Message | Text |
//! |---|---|
//! | Raw reply | `ADC value = <average>` |
//! | Millivolt reply | `ADC value = <mv> mV` |
//! | Periodic broadcast | `<mv>mV` |
//!
//! None of them carry a line ending; the CRLF is added by the outbound queue.

use crate::config::MESSAGE_CAPACITY;
use crate::sample::Average;
use core::fmt::Write;
use heapless::String;

/// Message body, without the CRLF prefix.
pub type Message = String<MESSAGE_CAPACITY>;

/// `ADC value = <average>`
pub fn raw_reading(average: Average) -> Message {
    let mut msg = Message::new();
    // Every body here is at most 25 bytes, so the writes below cannot fail
    write!(msg, "ADC value = {}", average).ok();
    msg
}

/// `ADC value = <mv> mV`
pub fn millivolt_reading(millivolts: u32) -> Message {
    let mut msg = Message::new();
    write!(msg, "ADC value = {} mV", millivolts).ok();
    msg
}

/// `<mv>mV`
pub fn broadcast(millivolts: u32) -> Message {
    let mut msg = Message::new();
    write!(msg, "{}mV", millivolts).ok();
    msg
}
