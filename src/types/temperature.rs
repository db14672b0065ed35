//! White color temperature.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// White temperature as a percentage between warm (0) and cool (100).
///
/// The bridge maps 0% to roughly 2700K and 100% to roughly 6500K.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Temperature {
    pub(crate) value: u8,
}

impl Temperature {
    const MIN: i32 = 0;
    const MAX: i32 = 100;
    const BASE_KELVIN: u16 = 2700;
    const KELVIN_PER_PERCENT: u16 = 38;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value exceeds 100.
    pub fn create(value: u8) -> Option<Self> {
        if i32::from(value) <= Self::MAX {
            Some(Temperature { value })
        } else {
            None
        }
    }

    /// Saturates any input into 0-100.
    ///
    /// ```
    /// use milight_bridge_rs::Temperature;
    ///
    /// assert_eq!(Temperature::clamped(-1).value(), 0);
    /// assert_eq!(Temperature::clamped(101).value(), 100);
    /// ```
    pub fn clamped(value: i32) -> Self {
        Temperature {
            value: value.clamp(Self::MIN, Self::MAX) as u8,
        }
    }

    /// Approximate color temperature in Kelvin.
    ///
    /// ```
    /// use milight_bridge_rs::Temperature;
    ///
    /// assert_eq!(Temperature::clamped(0).kelvin(), 2700);
    /// assert_eq!(Temperature::clamped(100).kelvin(), 6500);
    /// ```
    pub fn kelvin(&self) -> u16 {
        Self::BASE_KELVIN + Self::KELVIN_PER_PERCENT * u16::from(self.value)
    }
}

impl From<TemperaturePreset> for Temperature {
    fn from(preset: TemperaturePreset) -> Self {
        Temperature {
            value: preset as u8,
        }
    }
}

/// Common white temperatures.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum TemperaturePreset {
    /// 2700K
    Warm = 0,
    /// 3000K
    WarmWhite = 8,
    /// 4000K
    CoolWhite = 35,
    /// 5000K
    Daylight = 61,
    /// 6500K
    CoolDaylight = 100,
}
