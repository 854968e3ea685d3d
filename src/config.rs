//! Configuration primitives for the D7S driver.

use crate::params::{AxisSetting, Threshold};

/// Default number of retries after a failed register read.
pub const DEFAULT_READ_RETRIES: u8 = 5;
/// Default interval between two mode polls of a diagnostic routine.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;
/// Default number of mode polls before a diagnostic routine times out.
pub const DEFAULT_POLL_ATTEMPTS: u16 = 100;

/// How often a failed register read is attempted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// Retry up to the given number of times, then report the failure.
    Limited(u8),
    /// Retry until the bus answers. Can stall the caller forever.
    Unbounded,
}

impl RetryPolicy {
    /// Returns `true` when another attempt is allowed after `failures` failed ones.
    pub const fn allows_retry(self, failures: u16) -> bool {
        match self {
            Self::Limited(retries) => failures <= retries as u16,
            Self::Unbounded => true,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Limited(DEFAULT_READ_RETRIES)
    }
}

/// User-facing configuration for the D7S sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Retry policy applied to register reads.
    pub read_retry: RetryPolicy,
    /// Threshold level programmed by `init`, if any.
    pub threshold: Option<Threshold>,
    /// Axis selection mode programmed by `init`, if any.
    pub axis: Option<AxisSetting>,
    /// Interval between mode polls in diagnostic routines.
    pub poll_interval_ms: u32,
    /// Maximum number of mode polls in diagnostic routines.
    pub poll_attempts: u16,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is usable.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.poll_attempts == 0 {
            return Err(ConfigError::ZeroPollAttempts);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the read retry policy.
    pub fn read_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.read_retry = policy;
        self
    }

    /// Sets the threshold level applied during `init`.
    pub fn threshold(mut self, threshold: Threshold) -> Self {
        self.config.threshold = Some(threshold);
        self
    }

    /// Sets the axis selection mode applied during `init`.
    pub fn axis(mut self, axis: AxisSetting) -> Self {
        self.config.axis = Some(axis);
        self
    }

    /// Sets the polling cadence of diagnostic routines.
    pub fn polling(mut self, interval_ms: u32, attempts: u16) -> Self {
        self.config.poll_interval_ms = interval_ms;
        self.config.poll_attempts = attempts;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_retry: RetryPolicy::default(),
            threshold: None,
            axis: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Diagnostic routines would give up before polling once.
    ZeroPollAttempts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_policy_counts_retries_not_attempts() {
        let policy = RetryPolicy::Limited(2);
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
        assert!(!RetryPolicy::Limited(0).allows_retry(1));
        assert!(RetryPolicy::Unbounded.allows_retry(u16::MAX));
    }

    #[test]
    fn builder_rejects_zero_poll_attempts() {
        let config = Config::new().polling(10, 0).build();
        assert_eq!(config.validate(), Err(ConfigError::ZeroPollAttempts));
        assert!(Config::new().threshold(Threshold::Low).build().validate().is_ok());
    }
}
