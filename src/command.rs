//! Command templates understood by the bridge.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::Error;
use crate::types::{Brightness, Color, DiscoMode, Saturation, Temperature};

type Result<T> = std::result::Result<T, Error>;

/// Size of every command template.
pub const COMMAND_LEN: usize = 9;

/// Offset of the varying byte inside parameterized templates.
const PARAM_OFFSET: usize = 5;

const ON: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x04, 0x01, 0x00, 0x00, 0x00];
const OFF: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x04, 0x02, 0x00, 0x00, 0x00];
const NIGHT_MODE: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x04, 0x05, 0x00, 0x00, 0x00];
const WHITE_MODE: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x05, 0x64, 0x00, 0x00, 0x00];
const DISCO_SPEED_UP: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x04, 0x03, 0x00, 0x00, 0x00];
const DISCO_SLOW_DOWN: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x04, 0x04, 0x00, 0x00, 0x00];
const LINK: [u8; COMMAND_LEN] = [0x3D, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
const UNLINK: [u8; COMMAND_LEN] = [0x3E, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
const COLOR: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x01, 0x00, 0x00, 0x00, 0x00];
const SATURATION: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x02, 0x00, 0x00, 0x00, 0x00];
const BRIGHTNESS: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x03, 0x00, 0x00, 0x00, 0x00];
const TEMPERATURE: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x05, 0x00, 0x00, 0x00, 0x00];
const DISCO_MODE: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x08, 0x06, 0x00, 0x00, 0x00, 0x00];

const LAMP_ON: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x00, 0x03, 0x03, 0x00, 0x00, 0x00];
const LAMP_OFF: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x00, 0x03, 0x04, 0x00, 0x00, 0x00];
const LAMP_WHITE_MODE: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x00, 0x03, 0x05, 0x00, 0x00, 0x00];
const LAMP_DISCO_SPEED_UP: [u8; COMMAND_LEN] =
    [0x31, 0x00, 0x00, 0x00, 0x03, 0x02, 0x00, 0x00, 0x00];
const LAMP_DISCO_SLOW_DOWN: [u8; COMMAND_LEN] =
    [0x31, 0x00, 0x00, 0x00, 0x03, 0x01, 0x00, 0x00, 0x00];
const LAMP_COLOR: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
const LAMP_BRIGHTNESS: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00];
const LAMP_DISCO_MODE: [u8; COMMAND_LEN] = [0x31, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00];

/// Every operation the bridge accepts.
///
/// `Lamp*` kinds drive the indicator lamp on the bridge itself rather than a
/// zone of paired lights.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CommandKind {
    On,
    Off,
    NightMode,
    WhiteMode,
    DiscoSpeedUp,
    DiscoSlowDown,
    Link,
    Unlink,
    Color,
    Saturation,
    Brightness,
    Temperature,
    DiscoMode,
    LampOn,
    LampOff,
    LampWhiteMode,
    LampDiscoSpeedUp,
    LampDiscoSlowDown,
    LampColor,
    LampBrightness,
    LampDiscoMode,
}

impl CommandKind {
    fn template(&self) -> [u8; COMMAND_LEN] {
        match self {
            CommandKind::On => ON,
            CommandKind::Off => OFF,
            CommandKind::NightMode => NIGHT_MODE,
            CommandKind::WhiteMode => WHITE_MODE,
            CommandKind::DiscoSpeedUp => DISCO_SPEED_UP,
            CommandKind::DiscoSlowDown => DISCO_SLOW_DOWN,
            CommandKind::Link => LINK,
            CommandKind::Unlink => UNLINK,
            CommandKind::Color => COLOR,
            CommandKind::Saturation => SATURATION,
            CommandKind::Brightness => BRIGHTNESS,
            CommandKind::Temperature => TEMPERATURE,
            CommandKind::DiscoMode => DISCO_MODE,
            CommandKind::LampOn => LAMP_ON,
            CommandKind::LampOff => LAMP_OFF,
            CommandKind::LampWhiteMode => LAMP_WHITE_MODE,
            CommandKind::LampDiscoSpeedUp => LAMP_DISCO_SPEED_UP,
            CommandKind::LampDiscoSlowDown => LAMP_DISCO_SLOW_DOWN,
            CommandKind::LampColor => LAMP_COLOR,
            CommandKind::LampBrightness => LAMP_BRIGHTNESS,
            CommandKind::LampDiscoMode => LAMP_DISCO_MODE,
        }
    }

    /// Whether the template carries a varying payload byte.
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            CommandKind::Color
                | CommandKind::Saturation
                | CommandKind::Brightness
                | CommandKind::Temperature
                | CommandKind::DiscoMode
                | CommandKind::LampColor
                | CommandKind::LampBrightness
                | CommandKind::LampDiscoMode
        )
    }

    /// Whether the command addresses the bridge lamp instead of a zone.
    pub fn targets_bridge_lamp(&self) -> bool {
        matches!(
            self,
            CommandKind::LampOn
                | CommandKind::LampOff
                | CommandKind::LampWhiteMode
                | CommandKind::LampDiscoSpeedUp
                | CommandKind::LampDiscoSlowDown
                | CommandKind::LampColor
                | CommandKind::LampBrightness
                | CommandKind::LampDiscoMode
        )
    }

    /// Clamp a raw parameter into this kind's bound.
    fn clamp_param(&self, param: i32) -> u8 {
        match self {
            CommandKind::Color | CommandKind::LampColor => Color::clamped(param).value(),
            CommandKind::Saturation => Saturation::clamped(param).value(),
            CommandKind::Brightness | CommandKind::LampBrightness => {
                Brightness::clamped(param).value()
            }
            CommandKind::Temperature => Temperature::clamped(param).value(),
            CommandKind::DiscoMode | CommandKind::LampDiscoMode => DiscoMode::clamped(param).id(),
            _ => 0,
        }
    }
}

/// An immutable 9-byte command ready to be framed.
///
/// # Example
///
/// ```
/// use milight_bridge_rs::{Command, CommandKind};
///
/// let cmd = Command::build(CommandKind::Brightness, 250);
/// assert_eq!(cmd.bytes(), &[0x31, 0x00, 0x00, 0x08, 0x03, 100, 0x00, 0x00, 0x00]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command {
    bytes: [u8; COMMAND_LEN],
}

impl Command {
    /// Build the command for `kind`.
    ///
    /// `param` is ignored for parameterless kinds and saturated into the
    /// kind's bound otherwise (0-255 for colors, 0-100 for percentages,
    /// 1-9 for disco modes).
    pub fn build(kind: CommandKind, param: i32) -> Self {
        let mut bytes = kind.template();
        if kind.is_parameterized() {
            let value = kind.clamp_param(param);
            match kind {
                // color is repeated over the four trailing bytes
                CommandKind::Color | CommandKind::LampColor => {
                    bytes[PARAM_OFFSET..].fill(value);
                }
                _ => bytes[PARAM_OFFSET] = value,
            }
        }
        Command { bytes }
    }

    /// Build a parameterless command.
    pub fn fixed(kind: CommandKind) -> Self {
        Self::build(kind, 0)
    }

    pub fn color(color: Color) -> Self {
        Self::build(CommandKind::Color, color.value().into())
    }

    pub fn saturation(saturation: Saturation) -> Self {
        Self::build(CommandKind::Saturation, saturation.value().into())
    }

    pub fn brightness(brightness: Brightness) -> Self {
        Self::build(CommandKind::Brightness, brightness.value().into())
    }

    pub fn temperature(temperature: Temperature) -> Self {
        Self::build(CommandKind::Temperature, temperature.value().into())
    }

    pub fn disco_mode(mode: DiscoMode) -> Self {
        Self::build(CommandKind::DiscoMode, mode.id().into())
    }

    /// Wrap raw command bytes, rejecting anything that is not 9 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; COMMAND_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidCommandLength(bytes.len()))?;
        Ok(Command { bytes })
    }

    pub fn bytes(&self) -> &[u8; COMMAND_LEN] {
        &self.bytes
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
