//! Board support for the two-wire bus master: pin assignments per board
//! revision plus constructors for the TWIM bus and the console UARTE.
#![no_std]

mod board;
mod resources;

pub use board::*;
pub use resources::*;
