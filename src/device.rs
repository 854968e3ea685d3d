//! High-level D7S device driver implementation.

use crate::config::Config;
use crate::diagnostics;
use crate::error::{Error, Result};
use crate::events::EventLatch;
use crate::interface::i2c::I2cInterface;
use crate::interface::D7sInterface;
use crate::interrupt::Dispatcher;
use crate::measurement::{self, EarthquakeRecord};
use crate::params::{AxisInUse, AxisSetting, DiagnosticResult, OperatingMode, Threshold};
use crate::registers::{
    AxisState,
    Control,
    Event,
    RecordBank,
    Register,
    State,
    CLEAR_ALL_DATA,
    CLEAR_EARTHQUAKE_DATA,
    CLEAR_INSTALLATION_DATA,
    CLEAR_OFFSET_DATA,
    CLEAR_SELFTEST_DATA,
    MODE_INITIAL_INSTALLATION,
    MODE_OFFSET_ACQUISITION,
    MODE_SELFTEST,
    RECORD_PGA_OFFSET,
    RECORD_SI_OFFSET,
    RECORD_TEMPERATURE_OFFSET,
    REG_CLEAR_COMMAND,
    REG_MAIN_PGA,
    REG_MAIN_SI,
    REG_MODE,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

// Temperature, SI and PGA words of a record are contiguous.
const RECORD_BYTES: usize = 6;

/// High-level synchronous driver for the D7S seismic sensor.
pub struct D7s<IFACE> {
    interface: IFACE,
    config: Config,
    events: EventLatch,
    pub(crate) dispatcher: Dispatcher,
}

impl<IFACE> D7s<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    ///
    /// No handler is registered and interrupt dispatch starts disabled.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            events: EventLatch::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the active configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Shutoff/collapse judgements accumulated so far, without bus traffic.
    pub fn accumulated_events(&self) -> EventLatch {
        self.events
    }
}

impl<I2C, D> D7s<I2cInterface<I2C, D>>
where
    I2C: I2c,
    D: DelayNs,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I²C transports at the default address.
    pub fn new_i2c(i2c: I2C, delay: D, config: Config) -> Self {
        Self::new(I2cInterface::new(i2c, delay), config)
    }

    /// Releases the driver, returning the bus, the delay and the configuration.
    pub fn release_i2c(self) -> (I2C, D, Config) {
        let (iface, config) = self.release();
        let (i2c, delay) = iface.release();
        (i2c, delay, config)
    }
}

impl<IFACE, CommE> D7s<IFACE>
where
    IFACE: D7sInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Validates the configuration and programs the optional threshold and axis settings.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        if let Some(threshold) = self.config.threshold {
            self.set_threshold(threshold)?;
        }
        if let Some(axis) = self.config.axis {
            self.set_axis(axis)?;
        }

        debug!("d7s initialized");
        Ok(())
    }

    // ==================================================================
    // == Register Transport ============================================
    // ==================================================================
    /// Reads an 8-bit register, retrying per the configured policy.
    pub fn read_u8(&mut self, register: u16) -> Result<u8, CommE> {
        let mut raw = [0u8; 1];
        self.read_with_retry(register, &mut raw)?;
        Ok(raw[0])
    }

    /// Reads a big-endian 16-bit register pair, retrying per the configured policy.
    pub fn read_u16(&mut self, register: u16) -> Result<u16, CommE> {
        let mut raw = [0u8; 2];
        self.read_with_retry(register, &mut raw)?;
        Ok(u16::from_be_bytes(raw))
    }

    /// Writes an 8-bit register. Writes are never retried.
    pub fn write_u8(&mut self, register: u16, value: u8) -> Result<(), CommE> {
        trace!("write {=u16:#x} <- {=u8:#x}", register, value);
        self.interface.write_register(register, value).map_err(|err| {
            warn!("write of {=u16:#x} failed", register);
            Error::from(err)
        })
    }

    fn read_with_retry(&mut self, register: u16, buf: &mut [u8]) -> Result<(), CommE> {
        let mut failures: u16 = 0;
        loop {
            match self.interface.read_register(register, buf) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    failures = failures.saturating_add(1);
                    if !self.config.read_retry.allows_retry(failures) {
                        warn!("read of {=u16:#x} failed {} times, giving up", register, failures);
                        return Err(Error::RetriesExhausted(err));
                    }
                    debug!("read of {=u16:#x} failed, retry {}", register, failures);
                }
            }
        }
    }

    fn read_bits<R: Register>(&mut self) -> Result<R, CommE> {
        self.read_u8(R::ADDRESS).map(R::from)
    }

    // ==================================================================
    // == Mode & Axis State =============================================
    // ==================================================================
    /// Reads the current operating mode.
    pub fn mode(&mut self) -> Result<OperatingMode, CommE> {
        let state: State = self.read_bits()?;
        state
            .mode_or_err()
            .map_err(|_| Error::InvalidRegisterValue(u8::from(state) & 0x07))
    }

    /// Reads the axis pair currently used by the device.
    pub fn axis_in_use(&mut self) -> Result<AxisInUse, CommE> {
        let state: AxisState = self.read_bits()?;
        state
            .axis_or_err()
            .map_err(|_| Error::InvalidRegisterValue(u8::from(state) & 0x03))
    }

    /// Returns `true` while the device is processing an earthquake.
    pub fn is_earthquake_occurring(&mut self) -> Result<bool, CommE> {
        Ok(self.mode()? == OperatingMode::NormalNotInStandby)
    }

    /// Returns `true` when the device is in normal standby mode.
    pub fn is_ready(&mut self) -> Result<bool, CommE> {
        Ok(self.mode()? == OperatingMode::Normal)
    }

    // ==================================================================
    // == Threshold & Axis Settings =====================================
    // ==================================================================
    /// Reads back the programmed threshold level.
    pub fn threshold(&mut self) -> Result<Threshold, CommE> {
        let control: Control = self.read_bits()?;
        Ok(control.threshold())
    }

    /// Reads back the programmed axis selection mode.
    pub fn axis_setting(&mut self) -> Result<AxisSetting, CommE> {
        let control: Control = self.read_bits()?;
        control
            .axis_or_err()
            .map_err(|_| Error::InvalidRegisterValue(u8::from(control) >> 4))
    }

    /// Changes the threshold level, leaving the other `CTRL` bits untouched.
    pub fn set_threshold(&mut self, threshold: Threshold) -> Result<(), CommE> {
        self.update_control(|control| control.set_threshold(threshold))
    }

    /// Changes the axis selection mode, leaving the lower `CTRL` nibble untouched.
    pub fn set_axis(&mut self, axis: AxisSetting) -> Result<(), CommE> {
        self.update_control(|control| control.set_axis(axis))
    }

    fn update_control<F>(&mut self, mut mutate: F) -> Result<(), CommE>
    where
        F: FnMut(&mut Control),
    {
        let current = self.read_u8(Control::ADDRESS)?;

        let mut control = Control::from(current);
        mutate(&mut control);

        let updated = u8::from(control);
        if updated != current {
            self.write_u8(Control::ADDRESS, updated)?;
        }

        Ok(())
    }

    // ==================================================================
    // == Device Procedures =============================================
    // ==================================================================
    /// Starts the initial installation procedure.
    pub fn initialize(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_MODE, MODE_INITIAL_INSTALLATION)
    }

    /// Starts the self-diagnostic test.
    pub fn selftest(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_MODE, MODE_SELFTEST)
    }

    /// Starts offset acquisition.
    pub fn acquire_offset(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_MODE, MODE_OFFSET_ACQUISITION)
    }

    /// Result of the last self-diagnostic test.
    ///
    /// Only meaningful once the device has left [`OperatingMode::SelfTest`].
    pub fn selftest_result(&mut self) -> Result<DiagnosticResult, CommE> {
        let event = self.read_event()?;
        Ok(DiagnosticResult::from_error_flag(event.selftest_error()))
    }

    /// Result of the last offset acquisition.
    ///
    /// Only meaningful once the device has left [`OperatingMode::OffsetAcquisition`].
    pub fn acquire_offset_result(&mut self) -> Result<DiagnosticResult, CommE> {
        let event = self.read_event()?;
        Ok(DiagnosticResult::from_error_flag(event.offset_error()))
    }

    /// Runs the self-diagnostic test and waits for its result.
    pub fn run_self_test(&mut self, delay: &mut impl DelayNs) -> Result<DiagnosticResult, CommE> {
        diagnostics::run_self_test(self, delay)
    }

    /// Runs offset acquisition and waits for its result.
    pub fn run_offset_acquisition(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<DiagnosticResult, CommE> {
        diagnostics::run_offset_acquisition(self, delay)
    }

    /// Runs the initial installation procedure and waits until the device is back in standby.
    pub fn run_initial_installation(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        diagnostics::run_initial_installation(self, delay)
    }

    // ==================================================================
    // == Stored Data Management ========================================
    // ==================================================================
    /// Deletes the stored earthquake records.
    pub fn clear_earthquake_data(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_CLEAR_COMMAND, CLEAR_EARTHQUAKE_DATA)
    }

    /// Deletes the initial installation data.
    pub fn clear_installation_data(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_CLEAR_COMMAND, CLEAR_INSTALLATION_DATA)
    }

    /// Deletes the latest offset data.
    pub fn clear_latest_offset_data(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_CLEAR_COMMAND, CLEAR_OFFSET_DATA)
    }

    /// Deletes the self-diagnostic data.
    pub fn clear_selftest_data(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_CLEAR_COMMAND, CLEAR_SELFTEST_DATA)
    }

    /// Deletes every stored data category.
    pub fn clear_all_data(&mut self) -> Result<(), CommE> {
        self.write_u8(REG_CLEAR_COMMAND, CLEAR_ALL_DATA)
    }

    // ==================================================================
    // == Shutoff & Collapse Events =====================================
    // ==================================================================
    /// Returns `true` if a shutoff judgement was seen since the last [`reset_events`](Self::reset_events).
    pub fn is_in_shutoff(&mut self) -> Result<bool, CommE> {
        self.read_event()?;
        Ok(self.events.shutoff())
    }

    /// Returns `true` if a collapse judgement was seen since the last [`reset_events`](Self::reset_events).
    pub fn is_in_collapse(&mut self) -> Result<bool, CommE> {
        self.read_event()?;
        Ok(self.events.collapse())
    }

    /// Clears the device `EVENT` register and the accumulated judgements.
    ///
    /// Call after handling each earthquake, otherwise stale flags carry over
    /// into the next one.
    pub fn reset_events(&mut self) -> Result<(), CommE> {
        self.read_bits::<Event>()?;
        self.events.clear();
        Ok(())
    }

    fn read_event(&mut self) -> Result<Event, CommE> {
        let event: Event = self.read_bits()?;
        self.events.accumulate(event);
        Ok(event)
    }

    // ==================================================================
    // == Measurements ==================================================
    // ==================================================================
    /// Instantaneous peak ground velocity (spectral intensity) in m/s.
    pub fn instantaneous_pgv(&mut self) -> Result<f32, CommE> {
        self.read_u16(REG_MAIN_SI).map(measurement::from_milli)
    }

    /// Instantaneous peak ground acceleration in m/s².
    pub fn instantaneous_pga(&mut self) -> Result<f32, CommE> {
        self.read_u16(REG_MAIN_PGA).map(measurement::from_milli)
    }

    /// Intensity class (0–10) of the instantaneous PGA.
    pub fn intensity(&mut self) -> Result<u8, CommE> {
        self.instantaneous_pga().map(measurement::intensity_from_pga)
    }

    /// Peak ground velocity of latest record `index` (0 = most recent) in m/s.
    ///
    /// The device stores this velocity as the record's spectral intensity.
    pub fn historical_pgv(&mut self, index: u8) -> Result<f32, CommE> {
        self.historical_si(index)
    }

    /// Spectral intensity of latest record `index` in m/s.
    pub fn historical_si(&mut self, index: u8) -> Result<f32, CommE> {
        self.read_record_word(RecordBank::Latest, index, RECORD_SI_OFFSET)
            .map(measurement::from_milli)
    }

    /// Peak ground acceleration of latest record `index` in m/s².
    pub fn historical_pga(&mut self, index: u8) -> Result<f32, CommE> {
        self.read_record_word(RecordBank::Latest, index, RECORD_PGA_OFFSET)
            .map(measurement::from_milli)
    }

    /// Temperature at the time of latest record `index` in °C.
    pub fn historical_temperature(&mut self, index: u8) -> Result<f32, CommE> {
        self.read_record_word(RecordBank::Latest, index, RECORD_TEMPERATURE_OFFSET)
            .map(measurement::temperature_from_raw)
    }

    /// Temperature, SI and PGA of latest record `index`, in one transaction.
    pub fn historical_record(&mut self, index: u8) -> Result<EarthquakeRecord, CommE> {
        self.read_record(RecordBank::Latest, index)
    }

    /// Temperature, SI and PGA of the `index`-th largest recorded earthquake.
    pub fn ranked_record(&mut self, index: u8) -> Result<EarthquakeRecord, CommE> {
        self.read_record(RecordBank::Ranked, index)
    }

    fn read_record_word(&mut self, bank: RecordBank, index: u8, offset: u16) -> Result<u16, CommE> {
        let address = bank.address(index, offset).ok_or(Error::InvalidParameter)?;
        self.read_u16(address)
    }

    fn read_record(&mut self, bank: RecordBank, index: u8) -> Result<EarthquakeRecord, CommE> {
        let address = bank
            .address(index, RECORD_TEMPERATURE_OFFSET)
            .ok_or(Error::InvalidParameter)?;

        let mut raw = [0u8; RECORD_BYTES];
        self.read_with_retry(address, &mut raw)?;
        Ok(EarthquakeRecord::from_bytes(raw))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::registers::{REG_AXIS_STATE, REG_CTRL, REG_EVENT, REG_STATE};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    pub(crate) type MockIface = I2cInterface<I2cMock, NoopDelay>;
    pub(crate) type MockD7s = D7s<MockIface>;

    pub(crate) fn read(register: u16, response: &[u8]) -> Transaction {
        Transaction::write_read(0x55, register.to_be_bytes().to_vec(), response.to_vec())
    }

    pub(crate) fn failed_read(register: u16, len: usize) -> Transaction {
        read(register, &vec![0u8; len]).with_error(ErrorKind::Other)
    }

    pub(crate) fn write(register: u16, value: u8) -> Transaction {
        let [high, low] = register.to_be_bytes();
        Transaction::write(0x55, vec![high, low, value])
    }

    pub(crate) fn mock_device(expectations: &[Transaction], config: Config) -> (MockD7s, I2cMock) {
        let i2c = I2cMock::new(expectations);
        (D7s::new_i2c(i2c.clone(), NoopDelay::new(), config), i2c)
    }

    #[test]
    fn mode_masks_state_register() {
        let (mut d7s, mut i2c) = mock_device(&[read(REG_STATE, &[0xF9]), read(REG_STATE, &[0x04])], Config::default());

        assert_eq!(d7s.mode(), Ok(OperatingMode::NormalNotInStandby));
        assert_eq!(d7s.mode(), Ok(OperatingMode::SelfTest));
        i2c.done();
    }

    #[test]
    fn unknown_mode_is_reported() {
        let (mut d7s, mut i2c) = mock_device(&[read(REG_STATE, &[0x06])], Config::default());

        assert_eq!(d7s.mode(), Err(Error::InvalidRegisterValue(0x06)));
        i2c.done();
    }

    #[test]
    fn axis_in_use_masks_two_bits() {
        let (mut d7s, mut i2c) = mock_device(&[read(REG_AXIS_STATE, &[0xFE])], Config::default());

        assert_eq!(d7s.axis_in_use(), Ok(AxisInUse::Xy));
        i2c.done();
    }

    #[test]
    fn failed_reads_are_retried_until_success() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                failed_read(REG_STATE, 1),
                failed_read(REG_STATE, 1),
                read(REG_STATE, &[0x00]),
            ],
            Config::default(),
        );

        assert_eq!(d7s.mode(), Ok(OperatingMode::Normal));
        i2c.done();
    }

    #[test]
    fn retries_give_up_after_limit() {
        let config = Config::new().read_retry(RetryPolicy::Limited(2)).build();
        let (mut d7s, mut i2c) = mock_device(
            &[
                failed_read(REG_MAIN_PGA, 2),
                failed_read(REG_MAIN_PGA, 2),
                failed_read(REG_MAIN_PGA, 2),
            ],
            config,
        );

        assert_eq!(d7s.instantaneous_pga(), Err(Error::RetriesExhausted(ErrorKind::Other)));
        i2c.done();
    }

    #[test]
    fn failed_write_is_reported_once() {
        let (mut d7s, mut i2c) = mock_device(
            &[write(REG_MODE, MODE_SELFTEST).with_error(ErrorKind::Other)],
            Config::default(),
        );

        assert_eq!(d7s.selftest(), Err(Error::Interface(ErrorKind::Other)));
        i2c.done();
    }

    #[test]
    fn threshold_and_axis_share_control_register() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                read(REG_CTRL, &[0x05]),
                write(REG_CTRL, 0x0D),
                read(REG_CTRL, &[0x0D]),
                write(REG_CTRL, 0x3D),
                read(REG_CTRL, &[0x3D]),
                read(REG_CTRL, &[0x3D]),
            ],
            Config::default(),
        );

        d7s.set_threshold(Threshold::Low).unwrap();
        d7s.set_axis(AxisSetting::AutoSwitch).unwrap();
        assert_eq!(d7s.threshold(), Ok(Threshold::Low));
        assert_eq!(d7s.axis_setting(), Ok(AxisSetting::AutoSwitch));
        i2c.done();
    }

    #[test]
    fn unchanged_control_is_not_rewritten() {
        let (mut d7s, mut i2c) = mock_device(&[read(REG_CTRL, &[0x08])], Config::default());

        d7s.set_threshold(Threshold::Low).unwrap();
        i2c.done();
    }

    #[test]
    fn init_applies_configured_settings() {
        let config = Config::new()
            .threshold(Threshold::High)
            .axis(AxisSetting::ForceXy)
            .build();
        let (mut d7s, mut i2c) = mock_device(
            &[
                read(REG_CTRL, &[0x38]),
                write(REG_CTRL, 0x30),
                read(REG_CTRL, &[0x30]),
                write(REG_CTRL, 0x20),
            ],
            config,
        );

        d7s.init().unwrap();
        i2c.done();
    }

    #[test]
    fn init_rejects_invalid_config() {
        let config = Config::new().polling(10, 0).build();
        let (mut d7s, mut i2c) = mock_device(&[], config);

        assert_eq!(d7s.init(), Err(Error::InvalidConfig));
        i2c.done();
    }

    #[test]
    fn procedures_write_mode_commands() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                write(REG_MODE, 0x02),
                write(REG_MODE, 0x03),
                write(REG_MODE, 0x04),
            ],
            Config::default(),
        );

        d7s.initialize().unwrap();
        d7s.acquire_offset().unwrap();
        d7s.selftest().unwrap();
        i2c.done();
    }

    #[test]
    fn clear_commands_target_clear_register() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                write(REG_CLEAR_COMMAND, 0x01),
                write(REG_CLEAR_COMMAND, 0x02),
                write(REG_CLEAR_COMMAND, 0x04),
                write(REG_CLEAR_COMMAND, 0x08),
                write(REG_CLEAR_COMMAND, 0x0F),
            ],
            Config::default(),
        );

        d7s.clear_earthquake_data().unwrap();
        d7s.clear_selftest_data().unwrap();
        d7s.clear_latest_offset_data().unwrap();
        d7s.clear_installation_data().unwrap();
        d7s.clear_all_data().unwrap();
        i2c.done();
    }

    #[test]
    fn diagnostic_results_come_from_event_bits() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                read(REG_EVENT, &[0x04]),
                read(REG_EVENT, &[0x04]),
                read(REG_EVENT, &[0x08]),
            ],
            Config::default(),
        );

        assert_eq!(d7s.selftest_result(), Ok(DiagnosticResult::Error));
        assert_eq!(d7s.acquire_offset_result(), Ok(DiagnosticResult::Ok));
        assert_eq!(d7s.acquire_offset_result(), Ok(DiagnosticResult::Error));
        i2c.done();
    }

    #[test]
    fn events_accumulate_until_reset() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                read(REG_EVENT, &[0x01]),
                read(REG_EVENT, &[0x00]),
                read(REG_EVENT, &[0x00]),
                read(REG_EVENT, &[0x02]),
                read(REG_EVENT, &[0x00]),
                read(REG_EVENT, &[0x00]),
                read(REG_EVENT, &[0x00]),
            ],
            Config::default(),
        );

        assert_eq!(d7s.is_in_shutoff(), Ok(true));
        assert_eq!(d7s.is_in_shutoff(), Ok(true));
        assert_eq!(d7s.is_in_collapse(), Ok(false));
        assert_eq!(d7s.is_in_collapse(), Ok(true));
        assert_eq!(d7s.is_in_shutoff(), Ok(true));
        assert_eq!(d7s.accumulated_events().bits(), 0b11);

        d7s.reset_events().unwrap();
        assert_eq!(d7s.accumulated_events().bits(), 0);
        assert_eq!(d7s.is_in_collapse(), Ok(false));
        i2c.done();
    }

    #[test]
    fn diagnostic_reads_keep_pending_judgements() {
        let (mut d7s, mut i2c) = mock_device(
            &[read(REG_EVENT, &[0x05]), read(REG_EVENT, &[0x00])],
            Config::default(),
        );

        assert_eq!(d7s.selftest_result(), Ok(DiagnosticResult::Error));
        assert_eq!(d7s.is_in_shutoff(), Ok(true));
        i2c.done();
    }

    #[test]
    fn instantaneous_values_are_scaled() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                read(REG_MAIN_SI, &[0x00, 0xFA]),
                read(REG_MAIN_PGA, &[0x13, 0x88]),
                read(REG_MAIN_PGA, &[0x00, 0x0A]),
                read(REG_MAIN_PGA, &[0x00, 0x00]),
            ],
            Config::default(),
        );

        assert_eq!(d7s.instantaneous_pgv(), Ok(0.25));
        assert_eq!(d7s.instantaneous_pga(), Ok(5.0));
        assert_eq!(d7s.intensity(), Ok(2));
        assert_eq!(d7s.intensity(), Ok(0));
        i2c.done();
    }

    #[test]
    fn historical_values_use_record_banks() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                read(0x3008, &[0x01, 0xF4]),
                read(0x320A, &[0x03, 0xE8]),
                read(0x3406, &[0xFF, 0xEC]),
                read(0x3108, &[0x00, 0x64]),
            ],
            Config::default(),
        );

        assert_eq!(d7s.historical_pgv(0), Ok(0.5));
        assert_eq!(d7s.historical_pga(2), Ok(1.0));
        assert_eq!(d7s.historical_temperature(4), Ok(-2.0));
        assert_eq!(d7s.historical_si(1), Ok(0.1));
        i2c.done();
    }

    #[test]
    fn out_of_range_index_skips_the_bus() {
        let (mut d7s, mut i2c) = mock_device(&[], Config::default());

        for index in 5..=u8::MAX {
            assert_eq!(d7s.historical_pgv(index), Err(Error::InvalidParameter));
            assert_eq!(d7s.historical_pga(index), Err(Error::InvalidParameter));
            assert_eq!(d7s.ranked_record(index), Err(Error::InvalidParameter));
        }
        assert_eq!(d7s.historical_pga(9).unwrap_or_default(), 0.0);
        i2c.done();
    }

    #[test]
    fn records_are_read_in_one_transaction() {
        let (mut d7s, mut i2c) = mock_device(
            &[
                read(0x3006, &[0x00, 0xC8, 0x01, 0xF4, 0x03, 0xE8]),
                read(0x3506, &[0x00, 0x64, 0x00, 0x0A, 0x00, 0x14]),
            ],
            Config::default(),
        );

        let latest = d7s.historical_record(0).unwrap();
        assert_eq!((latest.temperature, latest.si, latest.pga), (20.0, 0.5, 1.0));

        let largest = d7s.ranked_record(0).unwrap();
        assert_eq!((largest.temperature, largest.si, largest.pga), (10.0, 0.01, 0.02));
        i2c.done();
    }
}
