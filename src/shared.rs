//! Process-wide driver slot for interrupt entry points.
//!
//! Pin interrupts carry no context, so the ISR glue needs a `static` through
//! which it can reach the driver. [`SharedD7s`] is that static: the main code
//! installs the driver once, and the ISRs call [`SharedD7s::on_int1`] /
//! [`SharedD7s::on_int2`].
//!
//! ```ignore
//! static D7S: SharedD7s<I2cInterface<MyI2c, MyDelay>> = SharedD7s::new();
//!
//! fn main() {
//!     D7S.install(D7s::new_i2c(i2c, delay, Config::default()));
//! }
//!
//! #[interrupt]
//! fn EXTI0() {
//!     let _ = D7S.on_int1();
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::device::D7s;
use crate::error::{Error, Result};
use crate::interface::D7sInterface;
use crate::interrupt::{Dispatch, InterruptEvent, InterruptPlatform};

/// Critical-section protected slot holding the single driver instance.
///
/// The bus I/O of an interrupt runs inside the critical section; the selected
/// handler runs after it is released and may use the slot again.
pub struct SharedD7s<IFACE> {
    inner: Mutex<RefCell<Option<D7s<IFACE>>>>,
}

impl<IFACE> SharedD7s<IFACE> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Installs `device`, returning the previously installed driver.
    pub fn install(&self, device: D7s<IFACE>) -> Option<D7s<IFACE>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(device))
    }

    /// Removes and returns the installed driver.
    pub fn take(&self) -> Option<D7s<IFACE>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Returns `true` once a driver is installed.
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// Runs `f` on the installed driver inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut D7s<IFACE>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<IFACE> Default for SharedD7s<IFACE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<IFACE, CommE> SharedD7s<IFACE>
where
    IFACE: D7sInterface<Error = CommE>,
{
    /// INT1 entry point.
    pub fn on_int1(&self) -> Result<Option<InterruptEvent>, CommE> {
        let dispatch = self.service(|device| device.service_int1())?;
        Ok(dispatch.map(Dispatch::invoke))
    }

    /// INT2 entry point.
    pub fn on_int2<P: InterruptPlatform>(&self, platform: &mut P) -> Result<Option<InterruptEvent>, CommE> {
        let dispatch = self.service(|device| device.service_int2(platform))?;
        Ok(dispatch.map(Dispatch::invoke))
    }

    fn service<F>(&self, f: F) -> Result<Option<Dispatch>, CommE>
    where
        F: FnOnce(&mut D7s<IFACE>) -> Result<Option<Dispatch>, CommE>,
    {
        self.with(f).unwrap_or_else(|| {
            warn!("interrupt before the driver was installed");
            Err(Error::NotReady)
        })
    }
}
