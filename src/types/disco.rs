//! Built-in animation programs.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// One of the nine preset disco animations.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum DiscoMode {
    Mode1 = 1,
    Mode2 = 2,
    Mode3 = 3,
    Mode4 = 4,
    Mode5 = 5,
    Mode6 = 6,
    Mode7 = 7,
    Mode8 = 8,
    Mode9 = 9,
}

impl DiscoMode {
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Returns None for anything other than 1-9.
    pub fn create(value: u8) -> Option<Self> {
        DiscoMode::iter().find(|mode| mode.id() == value)
    }

    /// Saturates any input into 1-9.
    ///
    /// ```
    /// use milight_bridge_rs::DiscoMode;
    ///
    /// assert_eq!(DiscoMode::clamped(0), DiscoMode::Mode1);
    /// assert_eq!(DiscoMode::clamped(5), DiscoMode::Mode5);
    /// assert_eq!(DiscoMode::clamped(42), DiscoMode::Mode9);
    /// ```
    pub fn clamped(value: i32) -> Self {
        let id = value.clamp(
            i32::from(DiscoMode::Mode1.id()),
            i32::from(DiscoMode::Mode9.id()),
        );
        // id is within 1..=9 so the lookup cannot miss
        Self::create(id as u8).unwrap_or(DiscoMode::Mode1)
    }
}
