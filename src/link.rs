//! Serial receive status
//!
//! The eUSCI latches receive errors in `UCAxSTATW`. [`RxStatus`] names those bits and
//! [`RxStatus::check`] turns a status word plus the received byte into the byte or a
//! [`RecvError`].

use bitflags::bitflags;
use core::fmt;
use embedded_hal_nb::serial::Read;

bitflags! {
    /// Bits of the eUSCI_A `UCAxSTATW` register in UART mode
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct RxStatus: u8 {
        /// Transmit or receive operation in progress
        const BUSY = 1 << 0;
        /// Address received (address-bit mode) or idle line detected (idle-line mode)
        const ADDR_IDLE = 1 << 1;
        /// A character was received with an error
        const RXERR = 1 << 2;
        /// Break condition
        const BRK = 1 << 3;
        /// Parity error
        const PE = 1 << 4;
        /// Overrun: a character arrived before the previous one was read
        const OE = 1 << 5;
        /// Framing error: low stop bit
        const FE = 1 << 6;
        /// Internal loopback enabled
        const LISTEN = 1 << 7;
    }
}

impl RxStatus {
    /// Classify a received byte by the status that came with it.
    ///
    /// Framing errors take precedence over parity errors, which take precedence over overruns.
    #[inline]
    pub fn check(self, data: u8) -> Result<u8, RecvError> {
        if self.contains(RxStatus::FE) {
            Err(RecvError::Framing)
        } else if self.contains(RxStatus::PE) {
            Err(RecvError::Parity)
        } else if self.contains(RxStatus::OE) {
            Err(RecvError::Overrun(data))
        } else {
            Ok(data)
        }
    }
}

/// Serial receive errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecvError {
    /// Framing error
    Framing,
    /// Parity error
    Parity,
    /// Buffer overrun error. Contains the most recently read byte, which is still valid.
    Overrun(u8),
}

impl RecvError {
    /// The byte that survived the error, if any.
    #[inline]
    pub fn salvage(self) -> Option<u8> {
        match self {
            RecvError::Overrun(byte) => Some(byte),
            RecvError::Framing | RecvError::Parity => None,
        }
    }
}

/// Take one byte from `rx` without blocking.
///
/// Bytes that arrived with a framing or parity error are dropped. An overrun still delivers a
/// valid byte, which is returned as usual.
pub fn try_read<RX: Read<u8, Error = RecvError>>(rx: &mut RX) -> Option<u8> {
    match rx.read() {
        Ok(byte) => Some(byte),
        Err(nb::Error::WouldBlock) => None,
        Err(nb::Error::Other(e)) => {
            warn!("receive error: {}", e);
            e.salvage()
        }
    }
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecvError::Framing => f.write_str("framing error"),
            RecvError::Parity => f.write_str("parity error"),
            RecvError::Overrun(_) => f.write_str("receive overrun"),
        }
    }
}

impl embedded_hal_nb::serial::Error for RecvError {
    fn kind(&self) -> embedded_hal_nb::serial::ErrorKind {
        use embedded_hal_nb::serial::ErrorKind;
        match self {
            RecvError::Framing => ErrorKind::FrameFormat,
            RecvError::Parity => ErrorKind::Parity,
            RecvError::Overrun(_) => ErrorKind::Overrun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_status_passes_byte_through() {
        assert_eq!(RxStatus::empty().check(b'a'), Ok(b'a'));
        assert_eq!((RxStatus::BUSY | RxStatus::LISTEN).check(b'v'), Ok(b'v'));
    }

    #[test]
    fn error_precedence() {
        let all = RxStatus::FE | RxStatus::PE | RxStatus::OE | RxStatus::RXERR;
        assert_eq!(all.check(b'a'), Err(RecvError::Framing));
        assert_eq!((RxStatus::PE | RxStatus::OE).check(b'a'), Err(RecvError::Parity));
        assert_eq!(RxStatus::OE.check(b'a'), Err(RecvError::Overrun(b'a')));
    }

    #[test]
    fn raw_register_value_decodes() {
        let status = RxStatus::from_bits_truncate(0x64);
        assert!(status.contains(RxStatus::FE | RxStatus::OE | RxStatus::RXERR));
        assert!(!status.contains(RxStatus::PE));
    }

    #[test]
    fn only_overrun_salvages_a_byte() {
        assert_eq!(RecvError::Overrun(b'V').salvage(), Some(b'V'));
        assert_eq!(RecvError::Framing.salvage(), None);
        assert_eq!(RecvError::Parity.salvage(), None);
    }

    struct Script<'a>(&'a [nb::Result<u8, RecvError>]);

    impl embedded_hal_nb::serial::ErrorType for Script<'_> {
        type Error = RecvError;
    }

    impl Read<u8> for Script<'_> {
        fn read(&mut self) -> nb::Result<u8, RecvError> {
            let (first, rest) = self.0.split_first().expect("script exhausted");
            self.0 = rest;
            first.clone()
        }
    }

    #[test]
    fn try_read_drops_corrupted_bytes() {
        let script = [
            Err(nb::Error::WouldBlock),
            Ok(b'a'),
            Err(nb::Error::Other(RecvError::Framing)),
            Err(nb::Error::Other(RecvError::Overrun(b'v'))),
        ];
        let mut rx = Script(&script);
        assert_eq!(try_read(&mut rx), None);
        assert_eq!(try_read(&mut rx), Some(b'a'));
        assert_eq!(try_read(&mut rx), None);
        assert_eq!(try_read(&mut rx), Some(b'v'));
    }

    #[test]
    fn error_kinds() {
        use embedded_hal_nb::serial::{Error, ErrorKind};
        assert_eq!(RecvError::Framing.kind(), ErrorKind::FrameFormat);
        assert_eq!(RecvError::Parity.kind(), ErrorKind::Parity);
        assert_eq!(RecvError::Overrun(0).kind(), ErrorKind::Overrun);
    }
}
