//! I²C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::D7sInterface;
use crate::registers::DEFAULT_ADDRESS;

/// Default pause before each bus transaction, in microseconds.
pub const DEFAULT_SETTLE_DELAY_US: u32 = 10_000;

/// I²C-based interface implementation for the D7S driver.
///
/// Reads are issued as a single write-read so the register address and the
/// data phase are joined by a repeated start, as the device requires.
pub struct I2cInterface<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    settle_delay_us: u32,
}

impl<I2C, D> I2cInterface<I2C, D> {
    /// Creates a new interface using the default device address.
    pub const fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: DEFAULT_ADDRESS,
            settle_delay_us: DEFAULT_SETTLE_DELAY_US,
        }
    }

    /// Overrides the 7-bit device address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Overrides the pause inserted before each transaction.
    pub fn with_settle_delay_us(mut self, settle_delay_us: u32) -> Self {
        self.settle_delay_us = settle_delay_us;
        self
    }

    /// Provides mutable access to the wrapped I²C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> I2cInterface<I2C, D>
where
    D: DelayNs,
{
    fn settle(&mut self) {
        if self.settle_delay_us > 0 {
            self.delay.delay_us(self.settle_delay_us);
        }
    }
}

impl<I2C, D> D7sInterface for I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = I2C::Error;

    fn read_register(&mut self, register: u16, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        self.settle();
        self.i2c.write_read(self.address, &register.to_be_bytes(), buf)
    }

    fn write_register(&mut self, register: u16, value: u8) -> core::result::Result<(), Self::Error> {
        let [high, low] = register.to_be_bytes();
        self.settle();
        self.i2c.write(self.address, &[high, low, value])
    }
}
