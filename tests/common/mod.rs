//! Host stand-ins for the LaunchPad peripherals

#![allow(dead_code)]

use core::convert::Infallible;
use std::collections::VecDeque;

use msp430_adc_reader::link::RecvError;
use msp430_adc_reader::tick::CountReload;
use msp430_adc_reader::{Board, Config, Device, Event, SharedBoard};

/// LED that remembers its level and how often it was driven
#[derive(Default)]
pub struct MockLed {
    pub high: bool,
    pub writes: usize,
}

impl embedded_hal::digital::ErrorType for MockLed {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

/// Transmitter that records every byte put on the wire. The first `refuse` writes find the
/// transmit register still occupied.
#[derive(Default)]
pub struct MockTx {
    pub wire: Vec<u8>,
    pub refuse: usize,
}

impl embedded_hal_nb::serial::ErrorType for MockTx {
    type Error = Infallible;
}

impl embedded_hal_nb::serial::Write<u8> for MockTx {
    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        if self.refuse > 0 {
            self.refuse -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.wire.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

/// Receiver fed from a script; `WouldBlock` once the script runs out
#[derive(Default)]
pub struct MockRx {
    pub pending: VecDeque<Result<u8, RecvError>>,
}

impl MockRx {
    pub fn with_bytes(bytes: &[u8]) -> Self {
        MockRx {
            pending: bytes.iter().copied().map(Ok).collect(),
        }
    }
}

impl embedded_hal_nb::serial::ErrorType for MockRx {
    type Error = RecvError;
}

impl embedded_hal_nb::serial::Read<u8> for MockRx {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        match self.pending.pop_front() {
            Some(Ok(byte)) => Ok(byte),
            Some(Err(e)) => Err(nb::Error::Other(e)),
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// Timer that records every reload
#[derive(Default)]
pub struct MockTimer {
    pub reloads: Vec<u16>,
}

impl CountReload for MockTimer {
    fn reload(&mut self, start: u16) {
        self.reloads.push(start);
    }
}

pub type TestBoard = Board<MockLed, MockTx, MockTimer>;
pub type TestShared = SharedBoard<MockLed, MockTx, MockTimer>;

pub fn board(config: Config) -> TestBoard {
    Board::new(
        Device::new(config),
        MockLed::default(),
        MockTx::default(),
        MockTimer::default(),
    )
}

/// Feed `raw` as five consecutive conversions, filling the whole buffer
pub fn fill(board: &mut TestBoard, raw: u16) {
    board.run([Event::ConversionComplete(raw); 5]);
}

/// Fire transmit-complete events until the outbound queue has drained
pub fn drain(board: &mut TestBoard) {
    while board.device().queue().is_in_flight() {
        board.dispatch(Event::TransmitComplete);
    }
}

/// Everything put on the wire so far, as text
pub fn wire(board: &TestBoard) -> String {
    String::from_utf8(board.tx().wire.clone()).expect("non-ASCII on the wire")
}

/// A shared slot holding a fresh board
pub fn shared(config: Config) -> TestShared {
    let shared = TestShared::new();
    shared.install(board(config));
    shared
}

/// Run `f` on the board in `shared`
pub fn inspect<R>(shared: &TestShared, f: impl FnOnce(&mut TestBoard) -> R) -> R {
    shared.with(f).expect("no board installed")
}
