//! The firmware's sharing pattern: one board in a static [`SharedBoard`], with "interrupts"
//! arriving from another thread.

mod common;

use std::thread;

use common::{board, inspect, MockRx, TestShared};
use msp430_adc_reader::sample::Average;
use msp430_adc_reader::{Config, Event};

static CAPTURE_BOARD: TestShared = TestShared::new();

#[test]
fn test_captures_from_interrupt_context_reach_main_loop() {
    CAPTURE_BOARD.install(board(Config::new()));

    let isr = thread::spawn(|| {
        for _ in 0..1000 {
            CAPTURE_BOARD.dispatch(Event::ConversionComplete(600));
        }
    });
    let mut rx = MockRx::default();
    while !isr.is_finished() {
        CAPTURE_BOARD.poll(&mut rx);
    }
    isr.join().unwrap();
    CAPTURE_BOARD.poll(&mut rx);

    inspect(&CAPTURE_BOARD, |board| {
        assert_eq!(board.device().average(), Average::new(600));
        assert!(!board.device().has_new_data());
        assert!(board.indicator().high);
    });
}

static REPLY_BOARD: TestShared = TestShared::new();

#[test]
fn test_reply_drains_from_interrupt_context() {
    let mut seeded = board(Config::new());
    seeded.run([Event::ConversionComplete(512); 5]);
    seeded.service_averaging();
    REPLY_BOARD.install(seeded);

    let mut rx = MockRx::with_bytes(b"v");
    REPLY_BOARD.poll(&mut rx);

    let isr = thread::spawn(|| {
        // Far more transmit-complete events than bytes; the extras do nothing
        for _ in 0..64 {
            REPLY_BOARD.dispatch(Event::TransmitComplete);
        }
    });
    isr.join().unwrap();

    inspect(&REPLY_BOARD, |board| {
        assert_eq!(board.tx().wire, b"\r\nADC value = 2500 mV");
        assert!(!board.device().queue().is_in_flight());
    });
}

static EMPTY_BOARD: TestShared = TestShared::new();

#[test]
fn test_events_before_install_are_discarded() {
    EMPTY_BOARD.dispatch(Event::ConversionComplete(1023));
    EMPTY_BOARD.dispatch(Event::TimerOverflow);
    let mut rx = MockRx::with_bytes(b"a");
    EMPTY_BOARD.poll(&mut rx);
    assert!(EMPTY_BOARD.with(|_| ()).is_none());

    EMPTY_BOARD.install(board(Config::new()));
    inspect(&EMPTY_BOARD, |board| {
        assert!(!board.device().has_new_data());
        assert!(board.tx().wire.is_empty());
    });
    assert!(EMPTY_BOARD.take().is_some());
    assert!(EMPTY_BOARD.take().is_none());
}
