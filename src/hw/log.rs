//! Log output on eUSCI_A0
//!
//! With the `defmt` feature the firmware writes its log frames to a second UART, transmit only,
//! on P1.7. It runs with the same settings as the command link. [`LogTx`] is a blocking
//! [`embedded_io::Write`] for `defmt-serial` to drive.

use super::serial::UCSSEL_SMCLK;
use crate::timing::BaudConfig;
use core::convert::Infallible;
use msp430fr2355 as pac;

/// Configure eUSCI_A0 with the `baud` divisors, clocked from SMCLK, and release it from reset.
///
/// P1.7 must already be routed to the peripheral (see
/// [`route_log_tx`](super::gpio::route_log_tx)).
pub fn configure(usci: pac::E_USCI_A0, baud: BaudConfig) -> LogTx {
    usci.uca0ctlw0().write(|w| w.ucswrst().set_bit());
    usci.uca0ctlw0()
        .write(|w| w.ucswrst().set_bit().ucssel().bits(UCSSEL_SMCLK));
    usci.uca0brw().write(|w| unsafe { w.bits(baud.br) });
    usci.uca0mctlw().write(|w| unsafe {
        w.ucos16()
            .bit(baud.ucos16)
            .ucbrs()
            .bits(baud.brs)
            .ucbrf()
            .bits(baud.brf)
    });
    unsafe { usci.uca0ctlw0().clear_bits(|w| w.ucswrst().clear_bit()) };
    LogTx(())
}

/// Log transmitter
pub struct LogTx(());

impl LogTx {
    #[inline(always)]
    fn txifg(&self) -> bool {
        let usci = unsafe { pac::E_USCI_A0::steal() };
        usci.uca0ifg().read().uctxifg().bit()
    }
}

impl embedded_io::ErrorType for LogTx {
    type Error = Infallible;
}

impl embedded_io::Write for LogTx {
    /// Send the first byte of `buf`, blocking until the Tx buffer accepts it, and return `Ok(1)`.
    /// An empty `buf` returns `Ok(0)` without blocking.
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let Some(&byte) = buf.first() else {
            return Ok(0);
        };
        while !self.txifg() {}
        let usci = unsafe { pac::E_USCI_A0::steal() };
        usci.uca0txbuf().write(|w| unsafe { w.uctxbuf().bits(byte) });
        Ok(1)
    }

    /// Wait for the Tx buffer to empty. The last byte may still be shifting out.
    #[inline]
    fn flush(&mut self) -> Result<(), Self::Error> {
        while !self.txifg() {}
        Ok(())
    }
}
