use std::fmt;

/// All error types that can occur when talking to a Milight bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A network socket operation failed while communicating with the bridge.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: std::io::Error },

    /// A command was issued before [`crate::Bridge::setup`] succeeded.
    #[error("bridge is not initialized; call setup first")]
    NotInitialized,

    /// Zone identifier outside 0-4.
    #[error("invalid zone {0} (must be between 0 and 4)")]
    InvalidZone(u8),

    /// Command template is not exactly 9 bytes long.
    #[error("invalid command size {0} instead of 9")]
    InvalidCommandLength(usize),

    /// No reply arrived before the configured timeout.
    #[error("timed out waiting for {phase} response")]
    Timeout { phase: Phase },

    /// A reply arrived but did not have the expected size.
    #[error("invalid {phase} response size {actual} instead of {expected}")]
    MalformedResponse {
        phase: Phase,
        expected: usize,
        actual: usize,
    },

    /// The acknowledgment carried another request's sequence number.
    #[error("invalid sequence number ack {actual} instead of {expected}")]
    SequenceMismatch { expected: u8, actual: u8 },
}

/// Protocol phase in which a response failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    StartSession,
    Command,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::StartSession => write!(f, "start session"),
            Phase::Command => write!(f, "command"),
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Socket creation, connection or I/O failure, or use before setup.
    Transport,
    /// Rejected locally before any I/O.
    InvalidInput,
    Timeout,
    MalformedResponse,
    SequenceMismatch,
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Socket { .. } | Error::NotInitialized => ErrorKind::Transport,
            Error::InvalidZone(_) | Error::InvalidCommandLength(_) => ErrorKind::InvalidInput,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Error::SequenceMismatch { .. } => ErrorKind::SequenceMismatch,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
