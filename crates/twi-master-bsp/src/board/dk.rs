use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::WDT;
use embassy_nrf::Peri;

use crate::{ConsoleResources, Twim1BusResources};

/// Peripherals of the nRF52840-DK. The bus uses the Arduino header
/// SDA/SCL pins and the console goes over the J-Link VCOM port.
pub struct TwiMaster {
    /// Peripherals for the I2C bus.
    pub twim1_bus_resources: Twim1BusResources,
    /// Peripherals for the console UART.
    pub console_resources: ConsoleResources,
    /// Watchdog Timer.
    pub wdt: Peri<'static, WDT>,
}

impl Default for TwiMaster {
    fn default() -> Self {
        let mut config = embassy_nrf::config::Config::default();
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;
        Self::new(config)
    }
}

impl TwiMaster {
    /// Create a new instance based on HAL configuration
    pub fn new(config: embassy_nrf::config::Config) -> Self {
        let p = embassy_nrf::init(config);

        Self {
            twim1_bus_resources: Twim1BusResources {
                twim: p.TWISPI1,
                sda: p.P0_26.into(),
                scl: p.P0_27.into(),
            },
            console_resources: ConsoleResources {
                uarte: p.UARTE0,
                txd: p.P0_06.into(),
                rxd: p.P0_08.into(),
            },
            wdt: p.WDT,
        }
    }
}
