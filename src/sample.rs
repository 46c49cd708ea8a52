//! Samples, the sample buffer and the derived average
//!
//! The ADC runs in repeat-single-channel mode, so conversion results arrive continuously and
//! are written into a [`SampleBuffer`] slot by slot. Once every slot has been written the cursor
//! wraps and the oldest slot of the cycle is overwritten next.

use crate::config::{ADC_FULL_SCALE, SAMPLE_MAX};
use core::fmt;

/// A single 10-bit conversion result.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample(u16);

impl Sample {
    /// Zero count sample.
    pub const ZERO: Sample = Sample(0);

    /// Wraps a raw conversion result, saturating at 1023.
    #[inline(always)]
    pub const fn from_raw(raw: u16) -> Self {
        if raw > SAMPLE_MAX {
            Sample(SAMPLE_MAX)
        } else {
            Sample(raw)
        }
    }

    /// The raw count.
    #[inline(always)]
    pub const fn count(self) -> u16 {
        self.0
    }
}

/// Fixed-capacity accumulator of the most recent `N` samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer<const N: usize> {
    slots: [Sample; N],
    cursor: usize,
}

impl<const N: usize> SampleBuffer<N> {
    /// Creates a buffer with every slot at zero and the cursor at slot 0.
    pub const fn new() -> Self {
        SampleBuffer {
            slots: [Sample::ZERO; N],
            cursor: 0,
        }
    }

    /// Stores `sample` at the cursor and advances it, wrapping to 0 after the last slot.
    #[inline]
    pub fn push(&mut self, sample: Sample) {
        self.slots[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor >= N {
            self.cursor = 0;
        }
    }

    /// Slot the next sample will be written to. Always in `[0, N)`.
    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Buffer contents in slot order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[Sample] {
        &self.slots
    }

    /// Sum of all slots.
    pub fn sum(&self) -> u32 {
        self.slots.iter().map(|s| u32::from(s.count())).sum()
    }

    /// Integer mean of all slots, truncating.
    pub fn average(&self) -> Average {
        // N * 1023 never exceeds u32 for any buffer that fits in RAM
        Average((self.sum() / N as u32) as u16)
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        SampleBuffer::new()
    }
}

/// Mean of the sample buffer, in raw counts.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Average(u16);

impl Average {
    /// Wraps a raw count.
    #[inline(always)]
    pub const fn new(count: u16) -> Self {
        Average(count)
    }

    /// The raw count.
    #[inline(always)]
    pub const fn count(self) -> u16 {
        self.0
    }

    /// Converts to millivolts against `vref_mv`, i.e. `floor(count / 1024 * vref_mv)`.
    #[inline]
    pub fn millivolts(self, vref_mv: u32) -> u32 {
        ((u64::from(self.0) * u64::from(vref_mv)) / u64::from(ADC_FULL_SCALE)) as u32
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
