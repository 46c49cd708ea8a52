//! MSP430FR2355 LaunchPad peripheral layer
//!
//! Pin assignment:
//!
//! | Function | Pin | Peripheral |
//! |---|---|---|
//! | Indicator LED | P1.0 | GPIO |
//! | Analog input | P1.1 (A1) | ADC |
//! | UART Rx | P4.2 | eUSCI_A1 |
//! | UART Tx | P4.3 | eUSCI_A1 |
//! | Log output (`defmt` feature) | P1.7 | eUSCI_A0 |
//!
//! Clock rates and the settings derived from them are in [`timing`](crate::timing).

pub mod adc;
pub mod gpio;
#[cfg(feature = "defmt")]
pub mod log;
pub mod serial;
pub mod timer;

use msp430fr2355 as pac;

/// ADC input channel. Channel n is on P1.n.
pub const ADC_CHANNEL: u8 = 1;

const WDT_PASSWORD: u8 = 0x5A;

/// Stop the watchdog. The firmware never services it.
#[inline]
pub fn stop_watchdog(wdt: &pac::WDT_A) {
    wdt.wdtctl()
        .write(|w| unsafe { w.wdtpw().bits(WDT_PASSWORD) }.wdthold().hold());
}

/// Release the GPIO high-impedance lock that is active after reset. Call after every pin has
/// been configured.
#[inline]
pub fn unlock_gpio(pmm: &pac::PMM) {
    pmm.pm5ctl0().write(|w| w.locklpm5().locklpm5_0());
}
