//! Client error hierarchy.
//!
//! Protocol and network failures end the connection and surface to the caller
//! of the failing operation. Command validation failures never reach this
//! type; they are answered in chat by the dispatcher (see
//! [`crate::commands::CommandError`]).

use bancho_proto::ProtocolError;
use thiserror::Error;

/// Errors returned by connection-level operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server sent a line that could not be parsed or framed.
    #[error("protocol error: {0}")]
    Protocol(#[source] ProtocolError),

    /// The server rejected the supplied credentials (464).
    #[error("server rejected credentials")]
    Authentication,

    /// Reading from or writing to the socket failed.
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// The operation's cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "protocol",
            Self::Authentication => "authentication",
            Self::Network(_) => "network",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the connection must be considered dead after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(io) => Self::Network(io),
            other => Self::Protocol(other),
        }
    }
}

/// Result type for connection-level operations.
pub type ClientResult<T = ()> = Result<T, ClientError>;
