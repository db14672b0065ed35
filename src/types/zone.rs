//! Addressable light groups.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::errors::Error;

/// A group of lights paired with the bridge.
///
/// [`Zone::All`] broadcasts to every group.
///
/// ```
/// use milight_bridge_rs::Zone;
///
/// assert_eq!(Zone::try_from(0).unwrap(), Zone::All);
/// assert_eq!(Zone::try_from(4).unwrap(), Zone::Four);
/// assert!(Zone::try_from(5).is_err());
/// ```
#[derive(
    Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display,
)]
pub enum Zone {
    #[default]
    All = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Zone {
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn create(value: u8) -> Option<Self> {
        Zone::iter().find(|zone| zone.id() == value)
    }
}

impl TryFrom<u8> for Zone {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Zone::create(value).ok_or(Error::InvalidZone(value))
    }
}
