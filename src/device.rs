//! Device state and event handlers
//!
//! All state shared between the interrupt handlers and the main loop lives in one [`Device`].
//! The handlers are methods on it that mutate the state and hand back whatever the hardware
//! should do next (a byte to load into the transmit register, a timer reload value, an indicator
//! level), so the same code runs on the target and in host tests.
//!
//! Access discipline:
//! - The sample buffer and new-data flag are written only by [`Device::on_conversion_complete`];
//!   the flag is cleared only by [`Device::take_new_data`].
//! - The outbound queue is filled by [`Device::send`] (main loop and tick handler) and drained
//!   only by [`Device::on_transmit_complete`]. Sends while a message is in flight follow
//!   [`Config::send_policy`].

use crate::command::Command;
use crate::config::{Config, SAMPLE_COUNT};
use crate::message;
use crate::queue::{OutboundQueue, SendError};
use crate::sample::{Average, Sample, SampleBuffer};
use crate::tick::TickCounter;
use embedded_hal::digital::PinState;

/// State of the indicator output
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Average at or above the threshold
    Active,
    /// Average below the threshold
    Inactive,
}

impl From<Level> for PinState {
    #[inline(always)]
    fn from(level: Level) -> Self {
        match level {
            Level::Active => PinState::High,
            Level::Inactive => PinState::Low,
        }
    }
}

/// What the periodic tick handler asks of the hardware.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Value to write back into the timer count register.
    pub reload: u16,
    /// First byte of the broadcast, to be written to the transmit register, or why the broadcast
    /// was not queued.
    pub transmit: Result<u8, SendError>,
    /// The elapsed-tick counter reached its delay and restarted.
    pub delay_elapsed: bool,
}

/// Everything the firmware remembers between events.
pub struct Device<const N: usize = SAMPLE_COUNT> {
    config: Config,
    samples: SampleBuffer<N>,
    new_data: bool,
    average: Average,
    queue: OutboundQueue,
    ticks: TickCounter,
}

impl<const N: usize> Device<N> {
    /// Creates the power-on state: empty buffer, flag clear, average zero, queue drained.
    pub const fn new(config: Config) -> Self {
        Device {
            samples: SampleBuffer::new(),
            new_data: false,
            average: Average::new(0),
            queue: OutboundQueue::new(),
            ticks: TickCounter::new(config.tick_delay),
            config,
        }
    }

    /// Active configuration.
    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Most recently computed average.
    #[inline(always)]
    pub fn average(&self) -> Average {
        self.average
    }

    /// Current sample buffer.
    #[inline(always)]
    pub fn samples(&self) -> &SampleBuffer<N> {
        &self.samples
    }

    /// Whether a sample has been captured since the averaging loop last ran.
    #[inline(always)]
    pub fn has_new_data(&self) -> bool {
        self.new_data
    }

    /// Outbound queue.
    #[inline(always)]
    pub fn queue(&self) -> &OutboundQueue {
        &self.queue
    }

    /// Elapsed-tick counter.
    #[inline(always)]
    pub fn ticks(&self) -> &TickCounter {
        &self.ticks
    }

    /// Conversion-complete handler. Stores the result and raises the new-data flag.
    #[inline]
    pub fn on_conversion_complete(&mut self, raw: u16) {
        self.samples.push(Sample::from_raw(raw));
        self.new_data = true;
    }

    /// If the new-data flag is raised, clear it and return a copy of the sample buffer.
    ///
    /// Returns `None` and changes nothing when the flag is clear. Samples captured between this
    /// call and the next are coalesced into a single notification.
    #[inline]
    pub fn take_new_data(&mut self) -> Option<SampleBuffer<N>> {
        if self.new_data {
            self.new_data = false;
            Some(self.samples)
        } else {
            None
        }
    }

    /// Store a freshly computed average and return the indicator level it implies.
    pub fn record_average(&mut self, average: Average) -> Level {
        self.average = average;
        if average.count() >= self.config.threshold {
            Level::Active
        } else {
            Level::Inactive
        }
    }

    /// One pass of the averaging loop: consume the new-data flag, average the buffer and decide
    /// the indicator level. `None` if there was no new data.
    pub fn service_averaging(&mut self) -> Option<Level> {
        let samples = self.take_new_data()?;
        let level = self.record_average(samples.average());
        trace!("average {} -> {}", self.average, level);
        Some(level)
    }

    /// Message sender. Queues CRLF plus `msg` and returns the byte that starts transmission.
    #[inline]
    pub fn send(&mut self, msg: &str) -> Result<u8, SendError> {
        self.queue.send(msg.as_bytes(), self.config.send_policy)
    }

    /// Command interpreter for one received byte.
    ///
    /// `Ok(None)` if the byte is not a command, otherwise the byte that starts transmission of
    /// the reply.
    pub fn on_command(&mut self, byte: u8) -> Result<Option<u8>, SendError> {
        let Some(command) = Command::from_byte(byte) else {
            return Ok(None);
        };
        debug!("command {}", command);
        let reply = command.reply(self.average, self.config.vref_mv);
        self.send(&reply).map(Some)
    }

    /// Transmit-complete handler. Next byte to load into the transmit register, `None` once the
    /// message has drained.
    #[inline]
    pub fn on_transmit_complete(&mut self) -> Option<u8> {
        self.queue.next_byte()
    }

    /// The transmitter refused the byte it was last handed. It stays queued and goes out on the
    /// next transmit-complete event.
    #[inline]
    pub fn on_transmit_refused(&mut self) {
        self.queue.unread();
    }

    /// Periodic tick handler. Counts the tick and broadcasts the current millivolt reading.
    pub fn on_timer_overflow(&mut self) -> TickOutcome {
        let reload = self.config.timer_start;
        let millivolts = self.average.millivolts(self.config.vref_mv);
        let transmit = self.send(&message::broadcast(millivolts));
        // Restarting the counter is the only thing that happens when the delay elapses
        let delay_elapsed = self.ticks.advance();
        if delay_elapsed {
            trace!("tick delay of {} elapsed", self.ticks.delay());
        }
        TickOutcome {
            reload,
            transmit,
            delay_elapsed,
        }
    }
}

impl<const N: usize> Default for Device<N> {
    fn default() -> Self {
        Device::new(Config::new())
    }
}
