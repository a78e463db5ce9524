#![cfg_attr(not(test), no_std)]
//! Device discovery and register access for a shared I2C bus.
//!
//! A [`Scanner`] periodically probes every 7-bit address and keeps an
//! ordered [`Roster`] of the devices that answer, reconciling it in place so
//! plugged and unplugged peripherals show up within one sweep. Register
//! reads and writes go through the same [`SharedBus`] lock as the probes,
//! one logical transaction at a time.

#[macro_use]
mod fmt;

mod bus;
pub mod console;
mod error;
pub mod registers;
mod roster;
mod scanner;

pub use bus::{SharedBus, MAX_ADDRESS};
pub use console::{Command, CommandError, Console};
pub use error::Error;
pub use roster::{Roster, SharedRoster, ROSTER_CAPACITY};
pub use scanner::{
    ConfigError, Outcome, ScanConfig, ScanCursor, Scanner, Settled,
    SweepReport,
};
