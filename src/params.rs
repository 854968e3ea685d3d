//! Strongly typed parameter enumerations for the D7S driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep register values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use d7s::params::{AxisSetting, Threshold};
//!
//! let threshold = Threshold::try_from(1).unwrap();
//! assert_eq!(threshold, Threshold::Low);
//! assert!(AxisSetting::try_from(7).is_err());
//! ```

use modular_bitfield::prelude::Specifier;

/// Operating modes reported in `STATE[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum OperatingMode {
    /// Normal mode, standby.
    Normal = 0x00,
    /// Normal mode, not in standby: an earthquake is being processed.
    NormalNotInStandby = 0x01,
    /// Initial installation mode.
    InitialInstallation = 0x02,
    /// Offset acquisition mode.
    OffsetAcquisition = 0x03,
    /// Self-diagnostic mode.
    SelfTest = 0x04,
}

/// Axis pair currently used for the calculation, reported in `AXIS_STATE[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum AxisInUse {
    /// Y and Z axes.
    Yz = 0b00,
    /// X and Z axes.
    Xz = 0b01,
    /// X and Y axes.
    Xy = 0b10,
}

/// Axis selection modes encoded in `CTRL[7:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum AxisSetting {
    /// Always use the Y and Z axes.
    ForceYz = 0x00,
    /// Always use the X and Z axes.
    ForceXz = 0x01,
    /// Always use the X and Y axes.
    ForceXy = 0x02,
    /// Switch axes automatically while measuring.
    AutoSwitch = 0x03,
    /// Select axes once, during initial installation.
    SwitchAtInstallation = 0x04,
}

impl TryFrom<u8> for AxisSetting {
    type Error = InvalidValue;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::ForceYz),
            0x01 => Ok(Self::ForceXz),
            0x02 => Ok(Self::ForceXy),
            0x03 => Ok(Self::AutoSwitch),
            0x04 => Ok(Self::SwitchAtInstallation),
            other => Err(InvalidValue(other)),
        }
    }
}

/// Shutoff/collapse threshold level encoded in `CTRL[3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum Threshold {
    /// Standard threshold.
    High = 0,
    /// Sensitive threshold.
    Low = 1,
}

impl TryFrom<u8> for Threshold {
    type Error = InvalidValue;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::High),
            1 => Ok(Self::Low),
            other => Err(InvalidValue(other)),
        }
    }
}

/// Outcome of a self-diagnostic or offset acquisition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiagnosticResult {
    /// The procedure completed without error.
    Ok,
    /// The device flagged an error.
    Error,
}

impl DiagnosticResult {
    /// Maps an error flag from the `EVENT` register.
    pub const fn from_error_flag(flag: bool) -> Self {
        if flag { Self::Error } else { Self::Ok }
    }

    /// Returns `true` when the procedure passed.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Raw value rejected by one of the `TryFrom<u8>` conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidValue(pub u8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_accepts_only_zero_and_one() {
        assert_eq!(Threshold::try_from(0), Ok(Threshold::High));
        assert_eq!(Threshold::try_from(1), Ok(Threshold::Low));
        for raw in 2..=u8::MAX {
            assert_eq!(Threshold::try_from(raw), Err(InvalidValue(raw)));
        }
    }

    #[test]
    fn axis_setting_accepts_zero_through_four() {
        assert_eq!(AxisSetting::try_from(3), Ok(AxisSetting::AutoSwitch));
        assert_eq!(AxisSetting::try_from(4), Ok(AxisSetting::SwitchAtInstallation));
        for raw in 5..=u8::MAX {
            assert!(AxisSetting::try_from(raw).is_err());
        }
    }

    #[test]
    fn diagnostic_result_follows_error_flag() {
        assert!(DiagnosticResult::from_error_flag(false).is_ok());
        assert_eq!(DiagnosticResult::from_error_flag(true), DiagnosticResult::Error);
    }
}
