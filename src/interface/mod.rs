//! Bus interface abstraction for the D7S driver.

pub mod i2c;

/// Abstraction over the low-level bus access required by the driver.
pub trait D7sInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads `buf.len()` consecutive bytes starting at `register`.
    fn read_register(&mut self, register: u16, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes a single register.
    fn write_register(&mut self, register: u16, value: u8) -> core::result::Result<(), Self::Error>;
}
