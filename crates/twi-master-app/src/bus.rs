//! Bounded-time transport for the shared bus.
//!
//! A peripheral unplugged mid-transfer can hold SCL low or leave the TWIM
//! waiting for a stop condition that never comes. Every transaction is
//! therefore raced against a timer; an elapsed timer surfaces as
//! `ErrorKind::Other`, which the scanner treats as "absent" and register
//! access reports as a bus error.

use embassy_time::{with_timeout, Duration};
use embedded_hal_async::i2c::{Error as _, ErrorKind, ErrorType, I2c, Operation};

/// Upper bound for one transaction, probes included.
pub const TRANSACTION_TIMEOUT: Duration = Duration::from_millis(10);

pub struct TimeoutI2c<I2C> {
    inner: I2C,
    timeout: Duration,
}

impl<I2C> TimeoutI2c<I2C> {
    pub const fn new(inner: I2C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<I2C: I2c> ErrorType for TimeoutI2c<I2C> {
    type Error = ErrorKind;
}

impl<I2C: I2c> I2c for TimeoutI2c<I2C> {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match with_timeout(
            self.timeout,
            self.inner.transaction(address, operations),
        )
        .await
        {
            Ok(result) => result.map_err(|e| e.kind()),
            Err(_) => {
                debug!("Transaction with {=u8:#x} timed out", address);
                Err(ErrorKind::Other)
            }
        }
    }
}
