use embassy_nrf::gpio::AnyPin;
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::peripherals::{self, TWISPI1, UARTE0};
use embassy_nrf::{bind_interrupts, twim, uarte, Peri};
use static_cell::ConstStaticCell;

/// Size of the TWIM transmit RAM buffer. Writes from flash are staged here.
pub const TWIM_BUFFER_LEN: usize = 32;

/// Peripherals for the I2C bus the scanner owns.
pub struct Twim1BusResources {
    pub twim: Peri<'static, TWISPI1>,
    pub sda: Peri<'static, AnyPin>,
    pub scl: Peri<'static, AnyPin>,
}

/// Peripherals for the text console.
pub struct ConsoleResources {
    pub uarte: Peri<'static, UARTE0>,
    pub txd: Peri<'static, AnyPin>,
    pub rxd: Peri<'static, AnyPin>,
}

bind_interrupts!(struct TwimIrqs {
    TWISPI1 => twim::InterruptHandler<peripherals::TWISPI1>;
});

bind_interrupts!(struct UarteIrqs {
    UARTE0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

impl Twim1BusResources {
    /// Build the TWIM driver at 100 kHz with the internal pull-ups enabled,
    /// so a bus with nothing plugged in still idles high.
    ///
    /// Consumes the resources; the RAM buffer can only be taken once.
    pub fn into_twim(self) -> twim::Twim<'static> {
        static RAM_BUFFER: ConstStaticCell<[u8; TWIM_BUFFER_LEN]> =
            ConstStaticCell::new([0; TWIM_BUFFER_LEN]);

        let mut config = twim::Config::default();
        config.sda_pullup = true;
        config.scl_pullup = true;
        interrupt::TWISPI1.set_priority(interrupt::Priority::P3);

        twim::Twim::new(
            self.twim,
            TwimIrqs,
            self.sda,
            self.scl,
            config,
            RAM_BUFFER.take(),
        )
    }
}

impl ConsoleResources {
    pub fn into_uarte(self, baudrate: uarte::Baudrate) -> uarte::Uarte<'static> {
        let mut config = uarte::Config::default();
        config.parity = uarte::Parity::EXCLUDED;
        config.baudrate = baudrate;
        interrupt::UARTE0.set_priority(interrupt::Priority::P3);

        uarte::Uarte::new(self.uarte, self.rxd, self.txd, UarteIrqs, config)
    }
}
