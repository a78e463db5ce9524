use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embedded_hal_async::i2c::I2c;

/// Highest valid 7-bit device address.
pub const MAX_ADDRESS: u8 = 0x7F;

/// I2C transport guarded by the bus lock.
///
/// Every logical transaction (a probe, a register read or write) holds the
/// lock from its first transport call to its last and releases it before
/// returning, so transactions from different tasks never interleave on the
/// wire. The lock is not reentrant: do not call back into `SharedBus` while
/// holding a guard.
pub struct SharedBus<M: RawMutex, I2C> {
    i2c: Mutex<M, I2C>,
}

impl<M: RawMutex, I2C> SharedBus<M, I2C> {
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c: Mutex::new(i2c) }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, M, I2C> {
        self.i2c.lock().await
    }

    /// Returns `true` while some task holds the bus lock.
    ///
    /// Non-blocking best-effort check using `try_lock`.
    pub fn is_busy(&self) -> bool {
        self.i2c.try_lock().is_err()
    }

    /// Consume the lock and hand back the transport.
    pub fn into_inner(self) -> I2C {
        self.i2c.into_inner()
    }
}

impl<M: RawMutex, I2C: I2c> SharedBus<M, I2C> {
    /// Test for presence with a zero-payload write.
    ///
    /// Any transport failure, including a timeout, reads as "absent".
    pub async fn probe(&self, address: u8) -> bool {
        if address > MAX_ADDRESS {
            return false;
        }
        let mut i2c = self.lock().await;
        i2c.write(address, &[]).await.is_ok()
    }
}
