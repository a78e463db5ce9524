/// Errors returned by register access on the shared bus.
#[derive(derive_more::From, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<I2cError> {
    /// The transport reported a failed transaction.
    I2c(I2cError),
    /// The device stopped answering before the full value was transferred.
    ///
    /// Raised when a read fails with `NoAcknowledge(Data)`. A master ACKs
    /// the bytes it receives, so a hardware controller does not report that
    /// kind on a read; only transports that detect the short transfer
    /// themselves and signal it this way produce `ShortRead`. Anything else
    /// arrives as [`Error::I2c`].
    #[from(ignore)]
    ShortRead,
    /// The target is outside the 7-bit address space.
    #[from(ignore)]
    InvalidAddress(u8),
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(err) => write!(f, "bus error: {:?}", err),
            Error::ShortRead => write!(f, "short read"),
            Error::InvalidAddress(address) => {
                write!(f, "invalid device address: {}", address)
            }
        }
    }
}
