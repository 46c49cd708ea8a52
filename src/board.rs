//! A [`Device`] wired to peripherals
//!
//! [`Board`] applies the side effects the device's handlers ask for: it drives the indicator pin
//! through [`OutputPin`], loads bytes into the transmit register through
//! [`embedded_hal_nb::serial::Write`] and rewinds the tick timer through [`CountReload`].
//!
//! Interrupts reach the board as [`Event`]s. The firmware creates one event per interrupt
//! vector; host tests feed whatever event sequence they like through [`Board::run`].
//!
//! The firmware keeps its board in a [`SharedBoard`], which the interrupt vectors and the main
//! loop both go through.

use crate::config::SAMPLE_COUNT;
use crate::device::{Device, Level};
use crate::link::{self, RecvError};
use crate::queue::SendError;
use crate::tick::CountReload;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_nb::serial::{Read, Write};

/// Hardware events that preempt the main loop
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The ADC finished a conversion with this result
    ConversionComplete(u16),
    /// The UART finished shifting out a byte
    TransmitComplete,
    /// The tick timer overflowed
    TimerOverflow,
}

/// Device state plus the peripherals its handlers drive
pub struct Board<LED, TX, TMR, const N: usize = SAMPLE_COUNT> {
    device: Device<N>,
    indicator: LED,
    tx: TX,
    timer: TMR,
}

impl<LED, TX, TMR, const N: usize> Board<LED, TX, TMR, N>
where
    LED: OutputPin,
    TX: Write<u8>,
    TMR: CountReload,
{
    /// Bind a device to its indicator pin, UART transmitter and tick timer.
    pub fn new(device: Device<N>, indicator: LED, tx: TX, timer: TMR) -> Self {
        Board {
            device,
            indicator,
            tx,
            timer,
        }
    }

    /// Device state.
    #[inline(always)]
    pub fn device(&self) -> &Device<N> {
        &self.device
    }

    /// Mutable device state.
    #[inline(always)]
    pub fn device_mut(&mut self) -> &mut Device<N> {
        &mut self.device
    }

    /// Indicator pin.
    #[inline(always)]
    pub fn indicator(&self) -> &LED {
        &self.indicator
    }

    /// UART transmitter.
    #[inline(always)]
    pub fn tx(&self) -> &TX {
        &self.tx
    }

    /// Tick timer.
    #[inline(always)]
    pub fn timer(&self) -> &TMR {
        &self.timer
    }

    /// Give back the device and peripherals.
    pub fn free(self) -> (Device<N>, LED, TX, TMR) {
        (self.device, self.indicator, self.tx, self.timer)
    }

    /// Run the handler for one hardware event.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::ConversionComplete(raw) => self.device.on_conversion_complete(raw),
            Event::TransmitComplete => {
                if let Some(byte) = self.device.on_transmit_complete() {
                    self.load_tx(byte);
                }
            }
            Event::TimerOverflow => {
                let outcome = self.device.on_timer_overflow();
                self.timer.reload(outcome.reload);
                self.start_tx(outcome.transmit);
            }
        }
    }

    /// Dispatch every event from `events` in order.
    pub fn run<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.dispatch(event);
        }
    }

    /// Drive the indicator pin to `level`.
    #[inline]
    pub fn apply_level(&mut self, level: Level) {
        self.indicator.set_state(level.into()).ok();
    }

    /// Averaging half of a main-loop iteration. Returns the new indicator level if there was new
    /// data.
    pub fn service_averaging(&mut self) -> Option<Level> {
        let level = self.device.service_averaging()?;
        self.apply_level(level);
        Some(level)
    }

    /// Interpret one received byte and start sending the reply, if any.
    pub fn handle_command(&mut self, byte: u8) {
        match self.device.on_command(byte) {
            Ok(Some(first)) => self.load_tx(first),
            Ok(None) => trace!("ignoring byte {=u8:#x}", byte),
            Err(e) => self.start_tx(Err(e)),
        }
    }

    fn start_tx(&mut self, transmit: Result<u8, SendError>) {
        match transmit {
            Ok(first) => self.load_tx(first),
            Err(e) => warn!("message dropped: {}", e),
        }
    }

    #[inline]
    fn load_tx(&mut self, byte: u8) {
        if self.tx.write(byte).is_err() {
            // Whatever occupies the transmit register raises transmit-complete when it is done,
            // and that event picks the byte up again
            self.device.on_transmit_refused();
            warn!("transmit register not ready, byte {=u8:#x} requeued", byte);
        }
    }
}

/// A [`Board`] shared between interrupt handlers and the main loop
///
/// Every access happens inside a critical section. [`SharedBoard::poll`] is the main loop body:
/// it keeps interrupts masked only while it touches shared state, so the average is computed
/// with interrupts enabled.
pub struct SharedBoard<LED, TX, TMR, const N: usize = SAMPLE_COUNT> {
    board: Mutex<RefCell<Option<Board<LED, TX, TMR, N>>>>,
}

impl<LED, TX, TMR, const N: usize> SharedBoard<LED, TX, TMR, N> {
    /// An empty slot. Events arriving before [`install`](Self::install) are discarded.
    pub const fn new() -> Self {
        SharedBoard {
            board: Mutex::new(RefCell::new(None)),
        }
    }

    /// Put `board` in the slot, returning whatever was there before.
    pub fn install(&self, board: Board<LED, TX, TMR, N>) -> Option<Board<LED, TX, TMR, N>> {
        critical_section::with(|cs| self.board.borrow_ref_mut(cs).replace(board))
    }

    /// Empty the slot.
    pub fn take(&self) -> Option<Board<LED, TX, TMR, N>> {
        critical_section::with(|cs| self.board.borrow_ref_mut(cs).take())
    }

    /// Run `f` on the board inside a critical section. `None` if no board is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut Board<LED, TX, TMR, N>) -> R) -> Option<R> {
        critical_section::with(|cs| self.board.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<LED, TX, TMR, const N: usize> SharedBoard<LED, TX, TMR, N>
where
    LED: OutputPin,
    TX: Write<u8>,
    TMR: CountReload,
{
    /// Run the handler for one hardware event. Called from the interrupt vectors.
    #[inline]
    pub fn dispatch(&self, event: Event) {
        self.with(|board| board.dispatch(event));
    }

    /// One main-loop iteration.
    ///
    /// If new samples arrived, take a copy of the buffer, average it outside the critical
    /// section, then store the result and drive the indicator. After that, consume at most one
    /// byte from `rx` (see [`link::try_read`]) and answer it.
    pub fn poll<RX: Read<u8, Error = RecvError>>(&self, rx: &mut RX) {
        let samples = self
            .with(|board| board.device_mut().take_new_data())
            .flatten();
        if let Some(samples) = samples {
            let average = samples.average();
            self.with(|board| {
                let level = board.device_mut().record_average(average);
                board.apply_level(level);
            });
        }

        if let Some(byte) = link::try_read(rx) {
            self.with(|board| board.handle_command(byte));
        }
    }
}

impl<LED, TX, TMR, const N: usize> Default for SharedBoard<LED, TX, TMR, N> {
    fn default() -> Self {
        SharedBoard::new()
    }
}
