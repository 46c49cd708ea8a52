//! Serial UART on eUSCI_A1
//!
//! 8 data bits, no parity, one stop bit, LSB first, clocked from SMCLK. [`configure`] produces a
//! [`Tx`] and an [`Rx`] that implement the single-byte, non-blocking
//! [`embedded-hal-nb`](embedded_hal_nb::serial) traits.
//!
//! Transmission is interrupt driven: after the first byte of a message is written, every
//! transmit-complete interrupt loads the next one. Reception is polled.

use crate::link::{RecvError, RxStatus};
use crate::timing::BaudConfig;
use core::convert::Infallible;
use msp430fr2355 as pac;

// UCSSELx: SMCLK
pub(crate) const UCSSEL_SMCLK: u8 = 0b10;

/// eUSCI_A1 interrupt sources, as reported by `UCA1IV`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UartVector {
    /// No interrupt pending
    None,
    /// Byte received
    Rx,
    /// Transmit buffer empty
    TxEmpty,
    /// Start bit received
    StartBit,
    /// Byte shifted out and transmit buffer empty
    TxComplete,
}

/// Configure eUSCI_A1 with the `baud` divisors, clocked from SMCLK, and release it from reset.
///
/// The pins must already be routed to the peripheral.
pub fn configure(usci: pac::E_USCI_A1, baud: BaudConfig) -> (Tx, Rx) {
    // Everything below may only be written while UCSWRST is set
    usci.uca1ctlw0().write(|w| w.ucswrst().set_bit());
    usci.uca1ctlw0().write(|w| {
        w.ucswrst()
            .set_bit()
            .ucssel()
            .bits(UCSSEL_SMCLK)
            // Erroneous bytes still set UCRXIFG so the error gets reported
            .ucrxeie()
            .set_bit()
    });
    usci.uca1brw().write(|w| unsafe { w.bits(baud.br) });
    usci.uca1mctlw().write(|w| unsafe {
        w.ucos16()
            .bit(baud.ucos16)
            .ucbrs()
            .bits(baud.brs)
            .ucbrf()
            .bits(baud.brf)
    });
    unsafe { usci.uca1ctlw0().clear_bits(|w| w.ucswrst().clear_bit()) };

    (Tx(()), Rx(()))
}

/// Decode and acknowledge the highest-priority pending eUSCI_A1 interrupt.
#[inline]
pub fn read_vector() -> UartVector {
    let usci = unsafe { pac::E_USCI_A1::steal() };
    match usci.uca1iv().read().bits() {
        0x02 => UartVector::Rx,
        0x04 => UartVector::TxEmpty,
        0x06 => UartVector::StartBit,
        0x08 => UartVector::TxComplete,
        _ => UartVector::None,
    }
}

/// Serial transmitter
pub struct Tx(());

impl Tx {
    /// Enable the transmit-complete interrupt, which fires after each byte has been shifted out.
    #[inline]
    pub fn enable_tx_complete_interrupts(&mut self) {
        let usci = unsafe { pac::E_USCI_A1::steal() };
        unsafe { usci.uca1ie().set_bits(|w| w.uctxcptie().set_bit()) };
    }

    #[inline(always)]
    fn txifg(&self) -> bool {
        let usci = unsafe { pac::E_USCI_A1::steal() };
        usci.uca1ifg().read().uctxifg().bit()
    }
}

/// Serial receiver
pub struct Rx(());

impl Rx {
    fn recv(&mut self) -> nb::Result<u8, RecvError> {
        let usci = unsafe { pac::E_USCI_A1::steal() };
        if usci.uca1ifg().read().ucrxifg().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        // Status has to be read before the buffer, reading UCA1RXBUF clears the error flags
        let status = RxStatus::from_bits_truncate(usci.uca1statw().read().bits() as u8);
        let data = usci.uca1rxbuf().read().ucrxbuf().bits();
        status.check(data).map_err(nb::Error::Other)
    }
}

mod ehal_nb1 {
    use super::*;
    use embedded_hal_nb::serial::{ErrorType, Read, Write};

    impl ErrorType for Rx {
        type Error = RecvError;
    }

    impl Read<u8> for Rx {
        /// Check if the Rx interrupt flag is set. If so, read the received byte, which clears
        /// the flag. Otherwise return `WouldBlock`.
        #[inline]
        fn read(&mut self) -> nb::Result<u8, Self::Error> {
            self.recv()
        }
    }

    impl ErrorType for Tx {
        type Error = Infallible;
    }

    impl Write<u8> for Tx {
        /// Write a byte into the Tx buffer if it's empty, otherwise return `WouldBlock`.
        #[inline]
        fn write(&mut self, data: u8) -> nb::Result<(), Self::Error> {
            if !self.txifg() {
                return Err(nb::Error::WouldBlock);
            }
            let usci = unsafe { pac::E_USCI_A1::steal() };
            usci.uca1txbuf().write(|w| unsafe { w.uctxbuf().bits(data) });
            Ok(())
        }

        /// Due to errata USCI42 the transmit-complete flag can't be trusted while more data is
        /// buffered, so this only waits for the Tx buffer to empty.
        #[inline]
        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            if self.txifg() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}
