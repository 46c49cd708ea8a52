#![no_main]
#![no_std]
#![feature(abi_msp430_interrupt)]

// Samples P1.1 continuously and lights the red LED on P1.0 while the average of the last five
// samples is at or above the threshold. On UART1 (57600 8N1), 'a' reports the average in counts
// and 'v' in millivolts. The reading in millivolts is also broadcast every ~12.5ms.
// With the `defmt` feature, log frames go out on UART0 (P1.7) at the same bit rate.

use msp430_adc_reader::{
    hw::{
        self,
        adc::{self, FreeRunningAdc},
        gpio::Led,
        serial::{self, Tx, UartVector},
        timer::{self, TickTimer},
    },
    timing::{AdcClock, UART_BAUD},
    Board, Config, Device, Event, SharedBoard,
};
use msp430_rt::entry;
use msp430fr2355::interrupt;
use panic_msp430 as _;

static BOARD: SharedBoard<Led, Tx, TickTimer> = SharedBoard::new();

#[cfg(feature = "defmt")]
static LOG_TX: static_cell::StaticCell<hw::log::LogTx> = static_cell::StaticCell::new();

#[entry]
fn main() -> ! {
    let Some(periph) = msp430fr2355::Peripherals::take() else { loop {} };
    hw::stop_watchdog(&periph.WDT_A);

    #[cfg(feature = "defmt")]
    hw::gpio::route_log_tx(&periph.P1);
    let led = hw::gpio::configure(periph.P1, &periph.P4);
    hw::unlock_gpio(&periph.PMM);

    #[cfg(feature = "defmt")]
    {
        let log_tx = hw::log::configure(periph.E_USCI_A0, UART_BAUD);
        defmt_serial::defmt_serial(LOG_TX.init(log_tx));
        defmt::info!("adc-reader starting");
    }

    let (mut tx, mut rx) = serial::configure(periph.E_USCI_A1, UART_BAUD);
    tx.enable_tx_complete_interrupts();

    let config = Config::new();
    let timer = TickTimer::start(periph.TB0, config.timer_start);

    let mut adc = FreeRunningAdc::new(periph.ADC, hw::ADC_CHANNEL, AdcClock::default());
    adc.enable_interrupts();

    BOARD.install(Board::new(Device::new(config), led, tx, timer));

    unsafe { msp430::interrupt::enable() };
    adc.start();

    loop {
        BOARD.poll(&mut rx);
    }
}

#[interrupt]
fn ADC() {
    BOARD.dispatch(Event::ConversionComplete(adc::read_result()));
}

#[interrupt]
fn EUSCI_A1() {
    if serial::read_vector() == UartVector::TxComplete {
        BOARD.dispatch(Event::TransmitComplete);
    }
}

#[interrupt]
fn TIMER0_B1() {
    if timer::take_overflow() {
        BOARD.dispatch(Event::TimerOverflow);
    }
}

// Debug builds emit calls to the abort() intrinsic, which MSP430 has no implementation of.
#[no_mangle]
extern "C" fn abort() -> ! {
    panic!();
}
