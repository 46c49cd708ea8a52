//! Tick timer on Timer_B0
//!
//! The timer counts up continuously from ACLK and overflows at 0xFFFF, raising `TIMER0_B1`.
//! Rewinding the count register to a start value on every overflow sets the period to
//! `0x10000 - start` ACLK cycles.

use crate::tick::CountReload;
use msp430fr2355 as pac;

// TBSSELx: ACLK
const TBSSEL_ACLK: u8 = 0b01;
// TB0IV value for a TB0R overflow
const TBIV_OVERFLOW: u16 = 0x0E;

/// Timer_B0 as a periodic tick source
pub struct TickTimer {
    timer: pac::TB0,
}

impl TickTimer {
    /// Start counting from `start`, clocked from undivided ACLK, with the overflow interrupt
    /// enabled.
    pub fn start(timer: pac::TB0, start: u16) -> Self {
        timer
            .tb0ctl()
            .write(|w| w.tbssel().bits(TBSSEL_ACLK).tbclr().set_bit());
        timer.tb0r().write(|w| unsafe { w.bits(start) });
        timer.tb0ctl().modify(|r, w| {
            unsafe { w.bits(r.bits()) }
                .tbifg()
                .clear_bit()
                .tbie()
                .set_bit()
                .mc()
                .continuous()
        });
        TickTimer { timer }
    }
}

impl CountReload for TickTimer {
    #[inline]
    fn reload(&mut self, start: u16) {
        self.timer.tb0r().write(|w| unsafe { w.bits(start) });
    }
}

/// Acknowledge the highest-priority pending `TIMER0_B1` interrupt and report whether it was an
/// overflow.
#[inline]
pub fn take_overflow() -> bool {
    let timer = unsafe { pac::TB0::steal() };
    timer.tb0iv().read().bits() == TBIV_OVERFLOW
}
