//! Value types for bridge command parameters.

mod brightness;
mod color;
mod disco;
mod saturation;
mod temperature;
mod zone;

pub use brightness::Brightness;
pub use color::Color;
pub use disco::DiscoMode;
pub use saturation::Saturation;
pub use temperature::{Temperature, TemperaturePreset};
pub use zone::Zone;
