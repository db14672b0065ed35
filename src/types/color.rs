//! Color wheel position.

use serde::{Deserialize, Serialize};

/// Position on the bridge's 256-step color wheel.
///
/// Unlike RGB, a single byte selects the hue; saturation and brightness are
/// separate commands.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub(crate) value: u8,
}

impl Color {
    pub const RED: Color = Color { value: 0xFF };
    pub const LAVENDER: Color = Color { value: 0xD9 };
    pub const BLUE: Color = Color { value: 0xBA };
    pub const AQUA: Color = Color { value: 0x85 };
    pub const GREEN: Color = Color { value: 0x7A };
    pub const LIME: Color = Color { value: 0x54 };
    pub const YELLOW: Color = Color { value: 0x3B };
    pub const ORANGE: Color = Color { value: 0x1E };

    pub fn new(value: u8) -> Self {
        Color { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Saturates any input into 0-255.
    ///
    /// ```
    /// use milight_bridge_rs::Color;
    ///
    /// assert_eq!(Color::clamped(9999), Color::RED);
    /// assert_eq!(Color::clamped(-20).value(), 0);
    /// assert_eq!(Color::clamped(0x7A), Color::GREEN);
    /// ```
    pub fn clamped(value: i32) -> Self {
        Color {
            value: value.clamp(u8::MIN.into(), u8::MAX.into()) as u8,
        }
    }
}

impl From<u8> for Color {
    fn from(value: u8) -> Self {
        Color::new(value)
    }
}
