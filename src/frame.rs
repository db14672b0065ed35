//! Byte-level framing of bridge requests.
//!
//! Everything here is pure: no sockets, no state.

use crate::command::COMMAND_LEN;
use crate::errors::Error;
use crate::types::Zone;

type Result<T> = std::result::Result<T, Error>;

pub const START_SESSION_FRAME_LEN: usize = 27;
pub const REQUEST_FRAME_LEN: usize = 22;

/// Handshake request asking the bridge for a fresh pair of session ids.
pub const START_SESSION_FRAME: [u8; START_SESSION_FRAME_LEN] = [
    0x20, 0x00, 0x00, 0x00, 0x16, 0x02, 0x62, 0x3A, 0xD5, 0xED, 0xA3, 0x01, 0xAE, 0x08, 0x2D, 0x46,
    0x61, 0x41, 0xA7, 0xF6, 0xDC, 0xAF, 0xD3, 0xE6, 0x00, 0x00, 0x1E,
];

const REQUEST_HEADER: [u8; 5] = [0x80, 0x00, 0x00, 0x00, 0x11];

/// Sum of the command bytes and the zone id, truncated to 8 bits.
///
/// ```
/// use milight_bridge_rs::frame::checksum;
///
/// assert_eq!(checksum(&[0x31, 0x00, 0x00, 0x08, 0x04, 0x01, 0x00, 0x00, 0x00], 1), 0x3F);
/// assert_eq!(checksum(&[0xFF; 9], 4), 0xFB);
/// ```
pub fn checksum(command: &[u8], zone: u8) -> u8 {
    command
        .iter()
        .fold(zone, |sum, byte| sum.wrapping_add(*byte))
}

/// Assemble the 22-byte request frame for a command.
///
/// Fails when `command` is not exactly 9 bytes or `zone` is outside 0-4.
pub fn request_frame(
    session_id1: u8,
    session_id2: u8,
    sequence: u8,
    command: &[u8],
    zone: u8,
) -> Result<[u8; REQUEST_FRAME_LEN]> {
    if command.len() != COMMAND_LEN {
        return Err(Error::InvalidCommandLength(command.len()));
    }
    let zone = Zone::try_from(zone)?.id();

    let mut frame = [0u8; REQUEST_FRAME_LEN];
    frame[..5].copy_from_slice(&REQUEST_HEADER);
    frame[5] = session_id1;
    frame[6] = session_id2;
    frame[8] = sequence;
    frame[10..10 + COMMAND_LEN].copy_from_slice(command);
    frame[19] = zone;
    frame[21] = checksum(command, zone);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandKind};
    use strum::IntoEnumIterator;

    #[test]
    fn test_request_frame_layout() {
        let cmd = Command::fixed(CommandKind::On);
        let frame = request_frame(0xAB, 0xCD, 0x07, cmd.bytes(), 2).unwrap();
        assert_eq!(
            frame,
            [
                0x80, 0x00, 0x00, 0x00, 0x11, 0xAB, 0xCD, 0x00, 0x07, 0x00, 0x31, 0x00, 0x00,
                0x08, 0x04, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x40
            ]
        );
    }

    #[test]
    fn test_checksum_matches_sum_for_every_kind_and_zone() {
        for kind in CommandKind::iter() {
            let cmd = Command::build(kind, 200);
            for zone in Zone::iter() {
                let expected = (cmd.bytes().iter().map(|b| *b as u32).sum::<u32>()
                    + zone.id() as u32)
                    % 256;
                let frame = request_frame(1, 2, 3, cmd.bytes(), zone.id()).unwrap();
                assert_eq!(frame[21] as u32, expected, "{kind} / {zone}");
            }
        }
    }

    #[test]
    fn test_rejects_bad_command_length() {
        assert_eq!(
            request_frame(0, 0, 1, &[0x31; 8], 0).unwrap_err(),
            Error::InvalidCommandLength(8)
        );
        assert_eq!(
            request_frame(0, 0, 1, &[0x31; 10], 0).unwrap_err(),
            Error::InvalidCommandLength(10)
        );
    }

    #[test]
    fn test_rejects_bad_zone() {
        let cmd = Command::fixed(CommandKind::Off);
        assert_eq!(
            request_frame(0, 0, 1, cmd.bytes(), 5).unwrap_err(),
            Error::InvalidZone(5)
        );
    }

    #[test]
    fn test_start_session_frame() {
        assert_eq!(START_SESSION_FRAME.len(), 27);
        assert_eq!(START_SESSION_FRAME[0], 0x20);
        assert_eq!(START_SESSION_FRAME[26], 0x1E);
    }
}
