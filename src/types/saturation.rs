//! Color saturation.

use serde::{Deserialize, Serialize};

/// Saturation percentage, 0 to 100.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Saturation {
    pub(crate) value: u8,
}

impl Saturation {
    const MIN: i32 = 0;
    const MAX: i32 = 100;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Saturates any input into 0-100.
    ///
    /// ```
    /// use milight_bridge_rs::Saturation;
    ///
    /// assert_eq!(Saturation::clamped(-4).value(), 0);
    /// assert_eq!(Saturation::clamped(73).value(), 73);
    /// assert_eq!(Saturation::clamped(101).value(), 100);
    /// ```
    pub fn clamped(value: i32) -> Self {
        Saturation {
            value: value.clamp(Self::MIN, Self::MAX) as u8,
        }
    }
}
