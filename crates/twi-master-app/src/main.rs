#![no_std]
#![no_main]

use embassy_nrf::uarte::Baudrate;
use static_cell::StaticCell;

#[cfg(feature = "defmt")]
use defmt_rtt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;
#[cfg(not(feature = "defmt"))]
use panic_reset as _;

use twi_master_app::prelude::*;

static SHARED_BUS: StaticCell<AppBus> = StaticCell::new();
static SCANNER: StaticCell<AppScanner> = StaticCell::new();

// Application main entry point. The spawner can be used to start async tasks.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("twi-master {} on {}", FW_VERSION, HW_VERSION);
    let board = TwiMaster::default();

    spawner.must_spawn(watchdog_task(board.wdt));

    let i2c = TimeoutI2c::new(
        board.twim1_bus_resources.into_twim(),
        TRANSACTION_TIMEOUT,
    );
    let bus = SHARED_BUS.init(SharedBus::new(i2c));
    let scanner = SCANNER.init(Scanner::new(bus, ScanConfig::default()));

    // Without hot-plug the roster is only refreshed by the `l` command.
    #[cfg(feature = "hot-plug")]
    spawner.must_spawn(scan_task(scanner));

    let uart = board.console_resources.into_uarte(Baudrate::BAUD115200);
    spawner.must_spawn(console_task(uart, scanner));
}
