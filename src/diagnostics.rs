//! Blocking helpers for the device-side diagnostic procedures.
//!
//! The trigger methods on [`D7s`] only write the `MODE` command. These helpers
//! additionally poll `STATE` until the device is back in normal mode, then
//! collect the result.

use embedded_hal::delay::DelayNs;

use crate::device::D7s;
use crate::error::{Error, Result};
use crate::interface::D7sInterface;
use crate::params::{DiagnosticResult, OperatingMode};

/// Runs the self-diagnostic test and returns its result.
pub fn run_self_test<IFACE, CommE>(
    device: &mut D7s<IFACE>,
    delay: &mut impl DelayNs,
) -> Result<DiagnosticResult, CommE>
where
    IFACE: D7sInterface<Error = CommE>,
{
    device.selftest()?;
    wait_until_normal(device, delay)?;
    device.selftest_result()
}

/// Runs offset acquisition and returns its result.
pub fn run_offset_acquisition<IFACE, CommE>(
    device: &mut D7s<IFACE>,
    delay: &mut impl DelayNs,
) -> Result<DiagnosticResult, CommE>
where
    IFACE: D7sInterface<Error = CommE>,
{
    device.acquire_offset()?;
    wait_until_normal(device, delay)?;
    device.acquire_offset_result()
}

/// Runs the initial installation procedure.
pub fn run_initial_installation<IFACE, CommE>(
    device: &mut D7s<IFACE>,
    delay: &mut impl DelayNs,
) -> Result<(), CommE>
where
    IFACE: D7sInterface<Error = CommE>,
{
    device.initialize()?;
    wait_until_normal(device, delay)
}

/// Polls `STATE` until the device reports [`OperatingMode::Normal`].
///
/// Waits `poll_interval_ms` before every poll, so the first read happens after
/// the device had time to leave its previous mode.
pub fn wait_until_normal<IFACE, CommE>(
    device: &mut D7s<IFACE>,
    delay: &mut impl DelayNs,
) -> Result<(), CommE>
where
    IFACE: D7sInterface<Error = CommE>,
{
    let interval_ms = device.config().poll_interval_ms;
    let attempts = device.config().poll_attempts;

    for attempt in 0..attempts {
        delay.delay_ms(interval_ms);
        let mode = device.mode()?;
        if mode == OperatingMode::Normal {
            debug!("device back in normal mode after {} polls", attempt + 1);
            return Ok(());
        }
        trace!("still in {}", mode);
    }

    warn!("device did not return to normal mode");
    Err(Error::Timeout)
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::device::tests::{mock_device, read, write};
    use crate::error::Error;
    use crate::params::DiagnosticResult;
    use crate::registers::{REG_EVENT, REG_MODE, REG_STATE};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn self_test_waits_for_normal_mode() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                write(REG_MODE, 0x04),
                read(REG_STATE, &[0x04]),
                read(REG_STATE, &[0x04]),
                read(REG_STATE, &[0x00]),
                read(REG_EVENT, &[0x00]),
            ],
            Config::default(),
        );

        assert_eq!(d7s.run_self_test(&mut NoopDelay::new()), Ok(DiagnosticResult::Ok));
        i2c.done();
    }

    #[test]
    fn offset_acquisition_reports_error_flag() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                write(REG_MODE, 0x03),
                read(REG_STATE, &[0x00]),
                read(REG_EVENT, &[0x08]),
            ],
            Config::default(),
        );

        assert_eq!(
            d7s.run_offset_acquisition(&mut NoopDelay::new()),
            Ok(DiagnosticResult::Error)
        );
        i2c.done();
    }

    #[test]
    fn installation_times_out_after_poll_budget() {
        let config = Config::new().polling(1, 2).build();
        let (mut d7s, mut i2c) = mock_device(
            &[
                write(REG_MODE, 0x02),
                read(REG_STATE, &[0x02]),
                read(REG_STATE, &[0x02]),
            ],
            config,
        );

        assert_eq!(d7s.run_initial_installation(&mut NoopDelay::new()), Err(Error::Timeout));
        i2c.done();
    }
}
