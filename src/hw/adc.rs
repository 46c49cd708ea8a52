//! ADC in repeat-single-channel mode
//!
//! Once started the ADC converts the selected channel back to back with no further software
//! involvement, raising the `ADC` interrupt after each conversion. Reading the result clears the
//! interrupt flag. [`AdcClock`] sets how often that happens.

use crate::timing::AdcClock;
use msp430fr2355 as pac;

// ADCCONSEQx: repeat-single-channel
const REPEAT_SINGLE_CHANNEL: u8 = 0b10;
// ADCRESx: 10-bit conversion
const RESOLUTION_10BIT: u8 = 0b01;

/// Continuously converting ADC
pub struct FreeRunningAdc {
    adc: pac::ADC,
}

impl FreeRunningAdc {
    /// Configure the ADC for continuous 10-bit conversions of `channel` against AVCC, clocked
    /// as `clock` says. Conversions don't start until [`start`](Self::start) is called.
    pub fn new(adc: pac::ADC, channel: u8, clock: AdcClock) -> Self {
        // Most settings can only be changed while ADCENC is clear
        unsafe {
            adc.adcctl0()
                .clear_bits(|w| w.adcenc().clear_bit().adcon().clear_bit());
        }

        let adcsht = clock.sample_time.adcsht();
        adc.adcctl0().write(|w| w.adcsht().bits(adcsht));

        let adcssel = clock.clock_source.adcssel();
        let adcdiv = clock.clock_divider.adcdiv();
        adc.adcctl1().write(|w| {
            w.adcssel()
                .bits(adcssel)
                .adcshp()
                .adcshp_1()
                .adcdiv()
                .bits(adcdiv)
                .adcconseq()
                .bits(REPEAT_SINGLE_CHANNEL)
        });

        let adcpdiv = clock.predivider.adcpdiv();
        adc.adcctl2()
            .write(|w| w.adcpdiv().bits(adcpdiv).adcres().bits(RESOLUTION_10BIT));

        adc.adcmctl0().write(|w| w.adcinch().bits(channel));

        // Multiple sample-and-convert: conversions follow each other without a new ADCSC edge
        unsafe {
            adc.adcctl0()
                .set_bits(|w| w.adcmsc().set_bit().adcon().set_bit());
        }
        FreeRunningAdc { adc }
    }

    /// Enable the conversion-complete interrupt.
    #[inline]
    pub fn enable_interrupts(&mut self) {
        unsafe { self.adc.adcie().set_bits(|w| w.adcie0().set_bit()) };
    }

    /// Start converting. Conversions continue until the ADC is reset.
    #[inline]
    pub fn start(&mut self) {
        unsafe {
            self.adc
                .adcctl0()
                .set_bits(|w| w.adcenc().set_bit().adcsc().set_bit());
        }
    }
}

/// Latest conversion result. Also clears the conversion-complete interrupt flag.
///
/// For use in the `ADC` interrupt handler, which has no access to the [`FreeRunningAdc`].
#[inline]
pub fn read_result() -> u16 {
    // Reading ADCMEM0 is free of side effects other than clearing ADCIFG0
    let adc = unsafe { pac::ADC::steal() };
    adc.adcmem0().read().bits()
}
