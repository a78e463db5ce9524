//! Register-level access to devices on the shared bus.
//!
//! Registers are 8-bit selectors latched by a write and followed by a
//! separate read transaction. Values travel big-endian.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use crate::bus::{SharedBus, MAX_ADDRESS};
use crate::error::Error;

/// Longest register write: selector, high byte, low byte.
pub const MAX_WRITE_LEN: usize = 3;

/// Encode a register write.
///
/// The high byte is only sent when `value` does not fit in one unsigned
/// byte, so `0..=255` costs one payload byte and everything else two. There
/// is no length prefix; peer devices rely on this framing as is.
pub fn encode_write(register: u8, value: i16) -> Vec<u8, MAX_WRITE_LEN> {
    let [high, low] = value.to_be_bytes();
    let mut frame = Vec::new();
    // Capacity covers the longest frame.
    let _ = frame.push(register);
    if !(0..=255).contains(&value) {
        let _ = frame.push(high);
    }
    let _ = frame.push(low);
    frame
}

/// Recover a value from a register-write payload (the bytes after the
/// selector).
///
/// A single byte is the unsigned low byte; two bytes are big-endian.
pub fn decode_write_payload(payload: &[u8]) -> Option<i16> {
    match *payload {
        [low] => Some(i16::from(low)),
        [high, low] => Some(i16::from_be_bytes([high, low])),
        _ => None,
    }
}

fn check_address<E>(address: u8) -> Result<(), Error<E>> {
    if address > MAX_ADDRESS {
        Err(Error::InvalidAddress(address))
    } else {
        Ok(())
    }
}

/// Classify a failed 2-byte read. Only `NoAcknowledge(Data)` counts as a
/// short read; see [`Error::ShortRead`] for which transports report it.
fn read_error<E: embedded_hal::i2c::Error>(err: E) -> Error<E> {
    match err.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => {
            Error::ShortRead
        }
        _ => Error::I2c(err),
    }
}

async fn read_int_locked<I2C: I2c>(
    i2c: &mut I2C,
    address: u8,
) -> Result<i16, Error<I2C::Error>> {
    let mut buf = [0u8; 2];
    i2c.read(address, &mut buf).await.map_err(read_error)?;
    Ok(i16::from_be_bytes(buf))
}

impl<M: RawMutex, I2C: I2c> SharedBus<M, I2C> {
    /// Address a device with an empty transaction to bring it out of a
    /// low-power state. Best effort: failures are only logged.
    pub async fn wake(&self, address: u8) {
        if address > MAX_ADDRESS {
            return;
        }
        let mut i2c = self.lock().await;
        if i2c.write(address, &[]).await.is_err() {
            debug!("wake: no response from {:#x}", address);
        }
    }

    /// Latch `register` as the selector for a following read.
    pub async fn set_register(
        &self,
        address: u8,
        register: u8,
    ) -> Result<(), Error<I2C::Error>> {
        check_address(address)?;
        let mut i2c = self.lock().await;
        i2c.write(address, &[register]).await?;
        Ok(())
    }

    /// Read a signed 16-bit value from the currently selected register.
    pub async fn read_int(
        &self,
        address: u8,
    ) -> Result<i16, Error<I2C::Error>> {
        check_address(address)?;
        let mut i2c = self.lock().await;
        read_int_locked(&mut *i2c, address).await
    }

    /// Select `register` and read it back, holding the bus for both steps.
    pub async fn read_int_register(
        &self,
        address: u8,
        register: u8,
    ) -> Result<i16, Error<I2C::Error>> {
        check_address(address)?;
        let mut i2c = self.lock().await;
        i2c.write(address, &[register]).await?;
        read_int_locked(&mut *i2c, address).await
    }

    /// Write `value` to `register` using the variable-width framing of
    /// [`encode_write`].
    pub async fn write_int_register(
        &self,
        address: u8,
        register: u8,
        value: i16,
    ) -> Result<(), Error<I2C::Error>> {
        check_address(address)?;
        let frame = encode_write(register, value);
        let mut i2c = self.lock().await;
        i2c.write(address, &frame).await?;
        Ok(())
    }
}
