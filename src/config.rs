//! Firmware configuration
//!
//! Capacities are compile-time constants. Everything the control loop compares against at
//! runtime (indicator threshold, tick delay, reference voltage, timer reload value and the
//! behaviour of the message sender while a message is in flight) lives in [`Config`].
//!
//! The default threshold and tick delay come from the board this firmware was first written for.
//! Both look like bring-up placeholders: a threshold of 4 counts is practically always exceeded,
//! and nothing happens when the tick delay elapses besides the counter being reset.

/// Number of samples held by the sample buffer and averaged together.
pub const SAMPLE_COUNT: usize = 5;

/// Capacity of the outbound queue in bytes, including the CRLF prefix.
pub const QUEUE_CAPACITY: usize = 50;

/// Length of the CRLF prefix written ahead of every message.
pub const LINE_PREFIX: &[u8] = b"\r\n";

/// Longest message body that fits in the outbound queue.
pub const MESSAGE_CAPACITY: usize = QUEUE_CAPACITY - LINE_PREFIX.len();

/// Largest value a 10-bit conversion can produce.
pub const SAMPLE_MAX: u16 = 1023;

/// Full-scale divisor used when converting counts to millivolts.
pub const ADC_FULL_SCALE: u32 = 1024;

/// Default indicator threshold, in raw counts.
pub const DEFAULT_THRESHOLD: u16 = 4;

/// Default number of ticks after which the elapsed-tick counter restarts.
pub const DEFAULT_TICK_DELAY: u16 = 40;

/// Default conversion reference voltage in millivolts.
pub const DEFAULT_VREF_MV: u32 = 5000;

/// Default value the timer count register is reloaded with on every overflow.
///
/// Counting from 65126 to overflow takes 410 ACLK cycles, about 12.5ms at 32768Hz.
pub const DEFAULT_TIMER_START: u16 = 65126;

/// What the message sender does when asked to send while a message is still in flight.
///
/// Default: reject the new message
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendPolicy {
    /// Leave the in-flight message alone and fail the new send with
    /// [`SendError::Busy`](crate::queue::SendError::Busy).
    #[default]
    Reject,
    /// Reset the queue and start the new message anyway. Whatever was left of the in-flight
    /// message is lost and the receiver sees a truncated line.
    Overwrite,
}

/// Runtime configuration of the control loop.
///
/// The default configuration is:
/// - Indicator threshold of 4 counts
/// - Tick delay of 40 ticks
/// - 5000mV reference voltage
/// - Timer reload value of 65126
/// - Reject sends while a message is in flight
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Averages at or above this many counts drive the indicator active.
    pub threshold: u16,
    /// Number of ticks after which the elapsed-tick counter restarts from zero.
    pub tick_delay: u16,
    /// Reference voltage used for millivolt conversion.
    pub vref_mv: u32,
    /// Value written back to the timer count register on every overflow.
    pub timer_start: u16,
    /// Behaviour of the message sender when a message is still in flight.
    pub send_policy: SendPolicy,
}

impl Config {
    /// Creates the default configuration. Usable in `const` and `static` initialisers.
    pub const fn new() -> Self {
        Config {
            threshold: DEFAULT_THRESHOLD,
            tick_delay: DEFAULT_TICK_DELAY,
            vref_mv: DEFAULT_VREF_MV,
            timer_start: DEFAULT_TIMER_START,
            send_policy: SendPolicy::Reject,
        }
    }

    /// Set the indicator threshold, in raw counts.
    pub const fn threshold(self, threshold: u16) -> Self {
        Config { threshold, ..self }
    }

    /// Set the number of ticks after which the elapsed-tick counter restarts.
    pub const fn tick_delay(self, tick_delay: u16) -> Self {
        Config { tick_delay, ..self }
    }

    /// Set the reference voltage in millivolts.
    pub const fn vref_mv(self, vref_mv: u32) -> Self {
        Config { vref_mv, ..self }
    }

    /// Set the timer reload value.
    pub const fn timer_start(self, timer_start: u16) -> Self {
        Config {
            timer_start,
            ..self
        }
    }

    /// Set the message sender's behaviour while a message is in flight.
    pub const fn send_policy(self, send_policy: SendPolicy) -> Self {
        Config {
            send_policy,
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
