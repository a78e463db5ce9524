#![no_std]

#[macro_use]
#[doc(hidden)]
pub mod fmt;

pub mod bus;
pub mod tasks;

use embassy_nrf::twim::Twim;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use i2c_roster::{Scanner, SharedBus};

pub const HW_VERSION: &str = env!("HW_VERSION");
pub const FW_VERSION: &str = env!("FW_VERSION");

/// The bus and roster are shared between executor tasks only, but the
/// critical-section mutex keeps them usable from interrupt executors too.
pub type BusMutexType = CriticalSectionRawMutex;
pub type AppI2c = bus::TimeoutI2c<Twim<'static>>;
pub type AppBus = SharedBus<BusMutexType, AppI2c>;
pub type AppScanner = Scanner<'static, BusMutexType, AppI2c>;

pub mod prelude {
    pub use super::{
        bus::*, error, info, tasks::*, unwrap, warn, AppBus, AppI2c,
        AppScanner, BusMutexType, FW_VERSION, HW_VERSION,
    };
    pub use embassy_executor::Spawner;
    pub use embassy_time::{Duration, Timer};

    pub use i2c_roster::{Console, ScanConfig, Scanner, SharedBus};
    pub use twi_master_bsp::{ConsoleResources, Twim1BusResources, TwiMaster};
}
