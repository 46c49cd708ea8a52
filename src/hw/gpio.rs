//! Pin multiplexing and the indicator LED

use super::ADC_CHANNEL;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use msp430fr2355 as pac;

const LED: u8 = 1 << 0;
const ANALOG_IN: u8 = 1 << ADC_CHANNEL;
const UART_RX: u8 = 1 << 2;
const UART_TX: u8 = 1 << 3;
#[cfg(feature = "defmt")]
const LOG_TX: u8 = 1 << 7;

/// Route P1.1 to the ADC and P4.2/P4.3 to eUSCI_A1, and make P1.0 an output driven low.
///
/// Takes effect once [`unlock_gpio`](super::unlock_gpio) is called.
pub fn configure(p1: pac::P1, p4: &pac::P4) -> Led {
    unsafe {
        // Analog function is SEL1:SEL0 = 11
        p1.p1sel0().set_bits(|w| w.bits(ANALOG_IN));
        p1.p1sel1().set_bits(|w| w.bits(ANALOG_IN));

        // UART function is SEL1:SEL0 = 01. clear_bits ANDs the register with the written value.
        p4.p4sel1().clear_bits(|w| w.bits(!(UART_RX | UART_TX)));
        p4.p4sel0().set_bits(|w| w.bits(UART_RX | UART_TX));

        p1.p1out().clear_bits(|w| w.bits(!LED));
        p1.p1dir().set_bits(|w| w.bits(LED));
    }
    Led { port: p1 }
}

/// Route P1.7 to eUSCI_A0 transmit for log output.
#[cfg(feature = "defmt")]
pub fn route_log_tx(p1: &pac::P1) {
    unsafe {
        p1.p1sel1().clear_bits(|w| w.bits(!LOG_TX));
        p1.p1sel0().set_bits(|w| w.bits(LOG_TX));
    }
}

/// Red LED on P1.0
pub struct Led {
    port: pac::P1,
}

impl ErrorType for Led {
    type Error = Infallible;
}

impl OutputPin for Led {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        unsafe { self.port.p1out().clear_bits(|w| w.bits(!LED)) };
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        unsafe { self.port.p1out().set_bits(|w| w.bits(LED)) };
        Ok(())
    }
}

impl StatefulOutputPin for Led {
    #[inline]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.p1out().read().bits() & LED != 0)
    }

    #[inline]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.p1out().read().bits() & LED == 0)
    }
}
