//! Text commands for inspecting the bus from a serial console.
//!
//! - `l`: sweep the bus and list every tracked device.
//! - `p <addr>`: dump registers 0..26, labelled `A`..`Z`, of one device.
//!
//! Anything else prints the help text. Replies are written to any
//! [`core::fmt::Write`] sink, one line per item.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::bus::MAX_ADDRESS;
use crate::scanner::Scanner;

/// Number of registers listed by the `p` command.
pub const PARAMETER_COUNT: u8 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    ListDevices,
    ListParameters(u8),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    MissingAddress,
    InvalidAddress,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::MissingAddress => write!(f, "Missing device ID"),
            CommandError::InvalidAddress => write!(f, "Invalid device ID"),
        }
    }
}

impl Command {
    /// Parse one console line. The command is the first character; an
    /// argument, if any, follows after optional whitespace.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let mut chars = line.chars();
        let Some(command) = chars.next() else {
            return Ok(Command::Help);
        };
        let argument = chars.as_str().trim();

        match command {
            'l' => Ok(Command::ListDevices),
            'p' => parse_address(argument).map(Command::ListParameters),
            _ => Ok(Command::Help),
        }
    }
}

fn parse_address(argument: &str) -> Result<u8, CommandError> {
    if argument.is_empty() {
        return Err(CommandError::MissingAddress);
    }
    let parsed = match argument
        .strip_prefix("0x")
        .or_else(|| argument.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => argument.parse::<u8>(),
    };
    match parsed {
        Ok(address) if address <= MAX_ADDRESS => Ok(address),
        _ => Err(CommandError::InvalidAddress),
    }
}

pub fn write_help<W: Write>(out: &mut W) -> core::fmt::Result {
    writeln!(out, "(l) List devices")?;
    writeln!(out, "(p <addr>) List parameters")
}

/// Serves console commands against one scanner and its bus.
pub struct Console<'s, 'a, M: RawMutex, I2C, const N: usize> {
    scanner: &'s Scanner<'a, M, I2C, N>,
}

impl<'s, 'a, M, I2C, const N: usize> Console<'s, 'a, M, I2C, N>
where
    M: RawMutex,
    I2C: I2c,
{
    pub fn new(scanner: &'s Scanner<'a, M, I2C, N>) -> Self {
        Self { scanner }
    }

    /// Parse and run one line, writing the reply to `out`.
    pub async fn execute<D: DelayNs, W: Write>(
        &self,
        line: &str,
        delay: &mut D,
        out: &mut W,
    ) -> core::fmt::Result {
        match Command::parse(line) {
            Ok(Command::ListDevices) => self.list_devices(delay, out).await,
            Ok(Command::ListParameters(address)) => {
                self.list_parameters(address, out).await
            }
            Ok(Command::Help) => write_help(out),
            Err(e) => writeln!(out, "{}", e),
        }
    }

    /// Sweep once, then print the roster in decimal and binary.
    pub async fn list_devices<D: DelayNs, W: Write>(
        &self,
        delay: &mut D,
        out: &mut W,
    ) -> core::fmt::Result {
        self.scanner.sweep(delay).await;
        writeln!(out, "I2C")?;
        for (i, address) in self.scanner.roster().iter().enumerate() {
            writeln!(out, "{}: {} - {:b}", i, address, address)?;
        }
        Ok(())
    }

    /// Read and print registers `A`..`Z` of `address`.
    pub async fn list_parameters<W: Write>(
        &self,
        address: u8,
        out: &mut W,
    ) -> core::fmt::Result {
        writeln!(out, "I2C device:")?;
        writeln!(out, "{}", address)?;
        let bus = self.scanner.bus();
        for register in 0..PARAMETER_COUNT {
            let label = char::from(b'A' + register);
            match bus.read_int_register(address, register).await {
                Ok(value) => {
                    writeln!(out, "{} : {} - {}", label, register, value)?
                }
                Err(e) => {
                    warn!("Reading register {} of {} failed", register, address);
                    writeln!(out, "{} : {} - {}", label, register, e)?
                }
            }
        }
        Ok(())
    }
}
