//! Interrupt-driven ADC reader for the MSP430FR2355.
//!
//! The firmware samples one analog input continuously, keeps the last [`SAMPLE_COUNT`] results
//! and lights an indicator LED whenever their average reaches a threshold. Over UART it answers
//! two single-byte commands and broadcasts the reading in millivolts on every timer tick:
//!
//! | Input | Output |
//! |---|---|
//! | `A` / `a` | `\r\nADC value = <average>` |
//! | `V` / `v` | `\r\nADC value = <mv> mV` |
//! | timer tick | `\r\n<mv>mV` |
//!
//! Three interrupts do the work: ADC conversion complete, UART transmit complete and timer
//! overflow. The main loop polls for new samples and received bytes.
//!
//! # Layout
//!
//! The control logic is hardware independent and builds on any target, which is how it is
//! tested. [`device::Device`] holds all shared state and exposes the interrupt handlers and
//! main-loop steps as methods; [`board::Board`] binds a device to [`embedded_hal`] peripherals.
//!
//! The MSP430FR2355 peripheral layer in `hw` and the `adc-reader` binary require the
//! `msp430fr2355` feature. To flash, make sure you have `mspdebug` with `tilib` support installed
//! and in $PATH, then run `cargo run --release --features msp430fr2355 --target msp430-none-elf`
//! with a LaunchPad plugged in.
//!
//! [`SAMPLE_COUNT`]: config::SAMPLE_COUNT

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

mod fmt;

pub mod board;
pub mod command;
pub mod config;
pub mod device;
pub mod link;
pub mod message;
pub mod queue;
pub mod sample;
pub mod tick;
pub mod timing;

#[cfg(feature = "msp430fr2355")]
pub mod hw;

#[cfg(feature = "msp430fr2355")]
pub use msp430fr2355 as pac;

pub use board::{Board, Event, SharedBoard};
pub use config::{Config, SendPolicy};
pub use device::{Device, Level, TickOutcome};
