//! Session identifiers and request sequencing.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Phase};

type Result<T> = std::result::Result<T, Error>;

pub const START_SESSION_RESPONSE_LEN: usize = 22;
pub const ACK_LEN: usize = 8;

const MAC_RANGE: std::ops::Range<usize> = 7..13;
const SESSION_ID1_OFFSET: usize = 19;
const SESSION_ID2_OFFSET: usize = 20;
const ACK_SEQUENCE_OFFSET: usize = 6;

/// Identifiers handed out by the bridge in reply to a start-session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// MAC address of the bridge, lower-case hex octets without padding.
    pub mac: String,
    pub session_id1: u8,
    pub session_id2: u8,
}

impl Session {
    /// Parse a start-session reply.
    ///
    /// ```
    /// use milight_bridge_rs::Session;
    ///
    /// let mut reply = [0u8; 22];
    /// reply[7..13].copy_from_slice(&[0x10, 0xFF, 0x12, 0xF0, 0xFF, 0xDE]);
    /// reply[19] = 0x2A;
    /// reply[20] = 0x01;
    ///
    /// let session = Session::parse(&reply).unwrap();
    /// assert_eq!(session.mac, "10:ff:12:f0:ff:de");
    /// assert_eq!((session.session_id1, session.session_id2), (0x2A, 0x01));
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != START_SESSION_RESPONSE_LEN {
            return Err(Error::MalformedResponse {
                phase: Phase::StartSession,
                expected: START_SESSION_RESPONSE_LEN,
                actual: data.len(),
            });
        }

        let mac = data[MAC_RANGE]
            .iter()
            .map(|octet| format!("{octet:x}"))
            .collect::<Vec<_>>()
            .join(":");

        Ok(Session {
            mac,
            session_id1: data[SESSION_ID1_OFFSET],
            session_id2: data[SESSION_ID2_OFFSET],
        })
    }
}

/// Check that `data` acknowledges the request sent with `sequence`.
pub fn check_ack(data: &[u8], sequence: u8) -> Result<()> {
    if data.len() != ACK_LEN {
        return Err(Error::MalformedResponse {
            phase: Phase::Command,
            expected: ACK_LEN,
            actual: data.len(),
        });
    }
    let acked = data[ACK_SEQUENCE_OFFSET];
    if acked != sequence {
        return Err(Error::SequenceMismatch {
            expected: sequence,
            actual: acked,
        });
    }
    Ok(())
}

/// Per-client request counter cycling through 1..=255.
///
/// Zero is never handed out; it only marks a counter that has not been used
/// yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCounter {
    value: u8,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last number handed out, or 0 if none.
    pub fn current(&self) -> u8 {
        self.value
    }

    /// Advance and return the next sequence number.
    pub fn advance(&mut self) -> u8 {
        self.value = match self.value.wrapping_add(1) {
            0 => 1,
            next => next,
        };
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}
