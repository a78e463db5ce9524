use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::WDT;
use embassy_nrf::Peri;

use crate::{ConsoleResources, Twim1BusResources};

/// Peripherals of the r1 carrier: the hot-plug I2C header and the console
/// pins broken out on the debug connector.
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
                sda: p.P0_04.into(),
                scl: p.P0_06.into(),
            },
            console_resources: ConsoleResources {
                uarte: p.UARTE0,
                txd: p.P0_31.into(),
                rxd: p.P1_06.into(),
            },
            wdt: p.WDT,
        }
    }
}
