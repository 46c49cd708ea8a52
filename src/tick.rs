//! Elapsed-tick counter driven by the periodic timer
//!
//! The timer overflows every ~12.5ms. Each overflow advances a [`TickCounter`]; once the counter
//! reaches its delay it restarts from zero and reports that the delay elapsed, giving a second,
//! slower period. Nothing in the firmware acts on that slower period yet.

/// Timers whose count register can be rewound to a start value.
///
/// Rewinding on every overflow keeps the period at `0x10000 - start` counts.
pub trait CountReload {
    /// Write `start` into the count register.
    fn reload(&mut self, start: u16);
}

impl<T: CountReload + ?Sized> CountReload for &mut T {
    #[inline]
    fn reload(&mut self, start: u16) {
        T::reload(self, start)
    }
}

/// Counts ticks up to a configured delay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickCounter {
    count: u16,
    delay: u16,
}

impl TickCounter {
    /// Creates a counter at zero that restarts after `delay` ticks.
    pub const fn new(delay: u16) -> Self {
        TickCounter { count: 0, delay }
    }

    /// Ticks counted since the last restart.
    #[inline(always)]
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Number of ticks after which the counter restarts.
    #[inline(always)]
    pub fn delay(&self) -> u16 {
        self.delay
    }

    /// Count one tick. Returns `true` and restarts from zero when the delay has been reached.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        if self.count >= self.delay {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restarts_exactly_at_delay() {
        let mut ticks = TickCounter::new(40);
        for expected in 1..40 {
            assert!(!ticks.advance());
            assert_eq!(ticks.count(), expected);
        }
        assert!(ticks.advance());
        assert_eq!(ticks.count(), 0);
        assert!(!ticks.advance());
        assert_eq!(ticks.count(), 1);
    }

    #[test]
    fn delay_of_one_elapses_every_tick() {
        let mut ticks = TickCounter::new(1);
        for _ in 0..3 {
            assert!(ticks.advance());
            assert_eq!(ticks.count(), 0);
        }
    }
}
