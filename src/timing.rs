//! Clock settings for the peripherals
//!
//! The clock system is left at its reset configuration: MCLK and SMCLK from the DCO at ~1MHz,
//! ACLK from REFO at 32768Hz. The UART divisors and the ADC clocking derived from them are fixed
//! here.

use crate::config::DEFAULT_TIMER_START;

/// SMCLK frequency after reset. MCLK runs at the same rate.
pub const SMCLK_HZ: u32 = 1_000_000;

/// ACLK frequency after reset (REFO).
pub const ACLK_HZ: u32 = 32_768;

/// UART bit rate.
pub const BAUD_RATE: u32 = 57_600;

/// eUSCI_A baud-rate generator settings for `UCAxBRW` and `UCAxMCTLW`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudConfig {
    /// `UCBRx` prescaler
    pub br: u16,
    /// `UCBRSx` second modulation stage
    pub brs: u8,
    /// `UCBRFx` first modulation stage, only meaningful with oversampling
    pub brf: u8,
    /// `UCOS16` oversampling mode
    pub ucos16: bool,
}

impl BaudConfig {
    /// 57600 baud from a 1MHz clock. Taken from the recommended-settings table in the eUSCI
    /// chapter of the MSP430FR4xx/FR2xx family user's guide.
    pub const SMCLK_1MHZ_57600: BaudConfig = BaudConfig {
        br: 1,
        brs: 0x4A,
        brf: 1,
        ucos16: true,
    };

    /// Whole source-clock cycles per bit, ignoring the `UCBRSx` fine adjustment.
    pub const fn cycles_per_bit(&self) -> u32 {
        if self.ucos16 {
            self.br as u32 * 16 + self.brf as u32
        } else {
            self.br as u32
        }
    }
}

/// Settings the UART is brought up with: [`BAUD_RATE`] from SMCLK.
pub const UART_BAUD: BaudConfig = BaudConfig::SMCLK_1MHZ_57600;

/// How many ADCCLK cycles the ADC's sample-and-hold stage will last for.
///
/// Default: 16 cycles
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleTime {
    /// Sample for 4 ADCCLK cycles
    _4 = 0b0000,
    /// Sample for 8 ADCCLK cycles
    _8 = 0b0001,
    /// Sample for 16 ADCCLK cycles
    #[default]
    _16 = 0b0010,
    /// Sample for 32 ADCCLK cycles
    _32 = 0b0011,
    /// Sample for 64 ADCCLK cycles
    _64 = 0b0100,
}

impl SampleTime {
    /// `ADCSHTx` field value
    #[inline(always)]
    pub const fn adcsht(self) -> u8 {
        self as u8
    }

    /// Length of the sample-and-hold stage in ADCCLK cycles.
    pub const fn cycles(self) -> u32 {
        4 << (self as u32)
    }
}

/// Which clock source the ADC uses as input.
///
/// Default: SMCLK
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockSource {
    /// Use MODCLK (~5MHz, untrimmed) as the ADC input clock
    MODCLK = 0b00,
    /// Use ACLK as the ADC input clock
    ACLK = 0b01,
    /// Use SMCLK as the ADC input clock
    #[default]
    SMCLK = 0b10,
}

impl ClockSource {
    /// `ADCSSELx` field value
    #[inline(always)]
    pub const fn adcssel(self) -> u8 {
        self as u8
    }
}

/// How much the ADC input clock will be divided by prior to being divided by the ADC clock divider
///
/// Default: Divide by 64
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Predivider {
    /// Divide the input clock by 1
    _1 = 0b00,
    /// Divide the input clock by 4
    _4 = 0b01,
    /// Divide the input clock by 64
    #[default]
    _64 = 0b10,
}

impl Predivider {
    /// `ADCPDIVx` field value
    #[inline(always)]
    pub const fn adcpdiv(self) -> u8 {
        self as u8
    }

    const fn divisor(self) -> u32 {
        match self {
            Predivider::_1 => 1,
            Predivider::_4 => 4,
            Predivider::_64 => 64,
        }
    }
}

/// How much the ADC input clock will be divided by after being divided by the predivider
///
/// Default: Divide by 2
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockDivider {
    /// Divide the input clock by 1
    _1 = 0b000,
    /// Divide the input clock by 2
    #[default]
    _2 = 0b001,
    /// Divide the input clock by 4
    _4 = 0b011,
    /// Divide the input clock by 8
    _8 = 0b111,
}

impl ClockDivider {
    /// `ADCDIVx` field value
    #[inline(always)]
    pub const fn adcdiv(self) -> u8 {
        self as u8
    }

    const fn divisor(self) -> u32 {
        self as u32 + 1
    }
}

/// ADCCLK cycles a 10-bit conversion takes after the sample-and-hold stage.
pub const CONVERSION_CYCLES_10BIT: u32 = 12;

/// Clocking of the free-running ADC, which fixes how often the conversion-complete interrupt
/// fires.
///
/// The default is SMCLK / 64 / 2 with 16-cycle sampling: about 280 conversions a second, or one
/// every ~3600 MCLK cycles.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdcClock {
    /// ADC input clock
    pub clock_source: ClockSource,
    /// First divider stage
    pub predivider: Predivider,
    /// Second divider stage
    pub clock_divider: ClockDivider,
    /// Sample-and-hold length
    pub sample_time: SampleTime,
}

impl AdcClock {
    /// Creates the default clocking.
    pub const fn new() -> Self {
        AdcClock {
            clock_source: ClockSource::SMCLK,
            predivider: Predivider::_64,
            clock_divider: ClockDivider::_2,
            sample_time: SampleTime::_16,
        }
    }

    /// Configure the ADC input clock
    #[inline]
    pub const fn clock_source(mut self, clock_source: ClockSource) -> Self {
        self.clock_source = clock_source;
        self
    }

    /// Configure the first divider stage
    #[inline]
    pub const fn predivider(mut self, predivider: Predivider) -> Self {
        self.predivider = predivider;
        self
    }

    /// Configure the second divider stage
    #[inline]
    pub const fn clock_divider(mut self, clock_divider: ClockDivider) -> Self {
        self.clock_divider = clock_divider;
        self
    }

    /// Configure the sample-and-hold length
    #[inline]
    pub const fn sample_time(mut self, sample_time: SampleTime) -> Self {
        self.sample_time = sample_time;
        self
    }

    /// ADCCLK frequency when the selected source runs at `source_hz`.
    pub const fn adcclk_hz(&self, source_hz: u32) -> u32 {
        source_hz / (self.predivider.divisor() * self.clock_divider.divisor())
    }

    /// ADCCLK cycles from one conversion-complete interrupt to the next.
    pub const fn cycles_per_conversion(&self) -> u32 {
        self.sample_time.cycles() + CONVERSION_CYCLES_10BIT
    }

    /// Conversions per second when the selected source runs at `source_hz`.
    pub const fn conversion_rate_hz(&self, source_hz: u32) -> u32 {
        self.adcclk_hz(source_hz) / self.cycles_per_conversion()
    }
}

/// Time between tick timer overflows, in microseconds, when the count register is rewound to
/// `start` on every overflow.
pub const fn tick_period_us(start: u16) -> u32 {
    let counts = 0x1_0000 - start as u32;
    (counts as u64 * 1_000_000 / ACLK_HZ as u64) as u32
}

/// Tick period with the default reload value.
pub const DEFAULT_TICK_PERIOD_US: u32 = tick_period_us(DEFAULT_TIMER_START);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uart_divider_matches_bit_rate() {
        assert_eq!(UART_BAUD.cycles_per_bit(), SMCLK_HZ / BAUD_RATE);
        assert_eq!(
            BaudConfig {
                br: 3,
                brs: 0x92,
                brf: 0,
                ucos16: false
            }
            .cycles_per_bit(),
            ACLK_HZ / 9600
        );
    }

    #[test]
    fn sample_time_cycles() {
        assert_eq!(SampleTime::_4.cycles(), 4);
        assert_eq!(SampleTime::_16.cycles(), 16);
        assert_eq!(SampleTime::_64.cycles(), 64);
    }

    #[test]
    fn default_adc_rate_leaves_cpu_for_main_loop() {
        let clock = AdcClock::default();
        assert_eq!(clock, AdcClock::new());
        assert_eq!(clock.adcclk_hz(SMCLK_HZ), 7812);
        assert_eq!(clock.cycles_per_conversion(), 28);
        assert_eq!(clock.conversion_rate_hz(SMCLK_HZ), 279);
        // MCLK cycles available between two conversion-complete interrupts
        assert!(SMCLK_HZ / clock.conversion_rate_hz(SMCLK_HZ) > 3000);
    }

    #[test]
    fn undivided_adc_clock_converts_every_few_cpu_cycles() {
        let fast = AdcClock::new()
            .predivider(Predivider::_1)
            .clock_divider(ClockDivider::_1);
        assert_eq!(fast.adcclk_hz(SMCLK_HZ), SMCLK_HZ);
        assert!(SMCLK_HZ / fast.conversion_rate_hz(SMCLK_HZ) < 30);
    }

    #[test]
    fn divider_field_values() {
        assert_eq!(ClockDivider::_8.adcdiv(), 0b111);
        assert_eq!(
            AdcClock::new()
                .predivider(Predivider::_4)
                .clock_divider(ClockDivider::_8)
                .adcclk_hz(1_000_000),
            31_250
        );
        assert_eq!(ClockSource::SMCLK.adcssel(), 0b10);
        assert_eq!(Predivider::_64.adcpdiv(), 0b10);
    }

    #[test]
    fn default_tick_period_is_about_12ms() {
        assert_eq!(DEFAULT_TICK_PERIOD_US, 12_512);
        assert_eq!(tick_period_us(0), 2_000_000);
    }
}
