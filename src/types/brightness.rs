//! Brightness control for Milight lights.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 100 percent.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MIN: i32 = 0;
    const MAX: i32 = 100;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Saturates any input into 0-100.
    ///
    /// ```
    /// use milight_bridge_rs::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(-3).value(), 0);
    /// assert_eq!(Brightness::clamped(42).value(), 42);
    /// assert_eq!(Brightness::clamped(250).value(), 100);
    /// ```
    pub fn clamped(value: i32) -> Self {
        Brightness {
            value: value.clamp(Self::MIN, Self::MAX) as u8,
        }
    }
}
