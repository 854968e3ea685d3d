//! Error handling primitives for the D7S driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// A register read kept failing until the retry policy gave up.
    ///
    /// Carries the error reported by the last attempt.
    RetriesExhausted(E),
    /// An argument was outside the range accepted by the device.
    InvalidParameter,
    /// The device returned a value that does not map to a known encoding.
    InvalidRegisterValue(u8),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// No driver instance is available yet.
    NotReady,
    /// A device-side procedure did not finish within the polling budget.
    Timeout,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
