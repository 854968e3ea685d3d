//! Unit conversion and intensity classification.

/// Upper bounds (m/s², exclusive) of intensity classes 1 through 9.
const INTENSITY_UPPER_BOUNDS: [f32; 9] = [0.01, 0.02, 0.05, 0.10, 0.25, 0.50, 1.00, 2.50, 5.00];

/// Highest intensity class reported by [`intensity_from_pga`].
pub const MAX_INTENSITY: u8 = 10;

/// Converts a velocity or acceleration word (thousandths) to SI units.
#[inline]
pub fn from_milli(raw: u16) -> f32 {
    raw as f32 / 1000.0
}

/// Converts a temperature word (signed tenths of a degree) to °C.
#[inline]
pub fn temperature_from_raw(raw: u16) -> f32 {
    raw as i16 as f32 / 10.0
}

/// Classifies peak ground acceleration (m/s²) on the 0–10 intensity scale.
///
/// Zero maps to 0; each class covers `[lower, upper)` up to 5 m/s², above which
/// the result is [`MAX_INTENSITY`].
pub fn intensity_from_pga(pga: f32) -> u8 {
    if pga.is_nan() || pga <= 0.0 {
        return 0;
    }

    INTENSITY_UPPER_BOUNDS
        .iter()
        .position(|&upper| pga < upper)
        .map_or(MAX_INTENSITY, |class| class as u8 + 1)
}

/// Measurements stored by the device for one past earthquake.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EarthquakeRecord {
    /// Spectral intensity in m/s.
    pub si: f32,
    /// Peak ground acceleration in m/s².
    pub pga: f32,
    /// Sensor temperature in °C.
    pub temperature: f32,
}

impl EarthquakeRecord {
    /// Decodes the temperature, SI and PGA words of a record (6 bytes, big-endian).
    pub fn from_bytes(raw: [u8; 6]) -> Self {
        Self {
            temperature: temperature_from_raw(u16::from_be_bytes([raw[0], raw[1]])),
            si: from_milli(u16::from_be_bytes([raw[2], raw[3]])),
            pga: from_milli(u16::from_be_bytes([raw[4], raw[5]])),
        }
    }

    /// Intensity class of the recorded PGA.
    pub fn intensity(&self) -> u8 {
        intensity_from_pga(self.pga)
    }
}
