//! Register map definitions for the D7S seismic sensor.
//!
//! Register addresses are 16 bits wide and travel on the bus most significant
//! byte first.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AxisInUse, AxisSetting, OperatingMode, Threshold};

/// Default 7-bit I²C address of the D7S.
pub const DEFAULT_ADDRESS: u8 = 0x55;

/// Register address of `STATE`.
pub const REG_STATE: u16 = 0x1000;
/// Register address of `AXIS_STATE`.
pub const REG_AXIS_STATE: u16 = 0x1001;
/// Register address of `EVENT`.
pub const REG_EVENT: u16 = 0x1002;
/// Register address of `MODE`.
pub const REG_MODE: u16 = 0x1003;
/// Register address of `CTRL`.
pub const REG_CTRL: u16 = 0x1004;
/// Register address of `CLEAR_COMMAND`.
pub const REG_CLEAR_COMMAND: u16 = 0x1005;
/// Register address of `MAIN_SI_H` (instantaneous SI / PGV).
pub const REG_MAIN_SI: u16 = 0x2000;
/// Register address of `MAIN_PGA_H` (instantaneous PGA).
pub const REG_MAIN_PGA: u16 = 0x2002;

/// Base address of the latest-event record banks (`0x3000`..`0x3400`).
pub const LATEST_DATA_BASE: u16 = 0x3000;
/// Base address of the SI-ranked record banks (`0x3500`..`0x3900`).
pub const RANKED_DATA_BASE: u16 = 0x3500;
/// Address distance between two consecutive record banks.
pub const RECORD_STRIDE: u16 = 0x0100;
/// Number of records kept by the device per bank family.
pub const RECORD_COUNT: u8 = 5;

/// Offset of the temperature word inside a record.
pub const RECORD_TEMPERATURE_OFFSET: u16 = 0x06;
/// Offset of the SI word inside a record.
pub const RECORD_SI_OFFSET: u16 = 0x08;
/// Offset of the PGA word inside a record.
pub const RECORD_PGA_OFFSET: u16 = 0x0A;

/// Commands written to `MODE`.
pub const MODE_INITIAL_INSTALLATION: u8 = 0x02;
/// Starts offset acquisition.
pub const MODE_OFFSET_ACQUISITION: u8 = 0x03;
/// Starts the self-diagnostic test.
pub const MODE_SELFTEST: u8 = 0x04;

/// Commands written to `CLEAR_COMMAND`.
pub const CLEAR_EARTHQUAKE_DATA: u8 = 0x01;
/// Clears self-diagnostic data.
pub const CLEAR_SELFTEST_DATA: u8 = 0x02;
/// Clears the latest offset data.
pub const CLEAR_OFFSET_DATA: u8 = 0x04;
/// Clears initial installation data.
pub const CLEAR_INSTALLATION_DATA: u8 = 0x08;
/// Clears every data category at once.
pub const CLEAR_ALL_DATA: u8 = 0x0F;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register: From<u8> + Into<u8> + Copy {
    /// Register address as documented in the datasheet.
    const ADDRESS: u16;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
}

/// Bitfield representation of the `STATE` register (address `0x1000`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    // Current operating mode (bits 2:0).
    pub mode: OperatingMode,
    #[skip]
    __: B5,
}

/// Bitfield representation of the `AXIS_STATE` register (address `0x1001`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisState {
    // Axis pair in use (bits 1:0).
    pub axis: AxisInUse,
    #[skip]
    __: B6,
}

/// Bitfield representation of the `EVENT` register (address `0x1002`).
///
/// Reading the register clears it on the device.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    // Shutoff judgement (bit 0).
    pub shutoff: bool,
    // Collapse judgement (bit 1).
    pub collapse: bool,
    // Self-diagnostic error (bit 2).
    pub selftest_error: bool,
    // Offset acquisition error (bit 3).
    pub offset_error: bool,
    #[skip]
    __: B4,
}

/// Bitfield representation of the `CTRL` register (address `0x1004`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    #[skip]
    __: B3,
    // Threshold level (bit 3).
    pub threshold: Threshold,
    // Axis selection mode (bits 7:4).
    pub axis: AxisSetting,
}

macro_rules! byte_register {
    ($name:ident, $address:expr, $access:expr) => {
        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                Self::from_bytes([value])
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.into_bytes()[0]
            }
        }

        impl Register for $name {
            const ADDRESS: u16 = $address;
            const ACCESS: RegisterAccess = $access;
        }
    };
}

byte_register!(State, REG_STATE, RegisterAccess::ReadOnly);
byte_register!(AxisState, REG_AXIS_STATE, RegisterAccess::ReadOnly);
byte_register!(Event, REG_EVENT, RegisterAccess::ReadOnly);
byte_register!(Control, REG_CTRL, RegisterAccess::ReadWrite);

/// Families of historical records kept by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordBank {
    /// The five most recent earthquakes, index 0 being the latest.
    Latest,
    /// The five largest earthquakes ranked by SI, index 0 being the largest.
    Ranked,
}

impl RecordBank {
    /// Base address of the bank family.
    pub const fn base(self) -> u16 {
        match self {
            Self::Latest => LATEST_DATA_BASE,
            Self::Ranked => RANKED_DATA_BASE,
        }
    }

    /// Address of `offset` inside record `index`, or `None` when the index is out of range.
    pub const fn address(self, index: u8, offset: u16) -> Option<u16> {
        if index >= RECORD_COUNT {
            return None;
        }
        Some(self.base() + index as u16 * RECORD_STRIDE + offset)
    }
}
