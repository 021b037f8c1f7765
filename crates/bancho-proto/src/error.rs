//! Error types for the Bancho protocol library.
//!
//! This module defines error types for framing failures and
//! message parsing failures.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Extract the command token from raw line bytes (for error reporting).
///
/// Works on bytes so a hint is still available when the line is not valid
/// UTF-8. The command is the first space-delimited token after the optional
/// tag block (`@...`) and prefix (`:...`).
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    if pos < raw_line.len() && raw_line[pos] == b'@' {
        while pos < raw_line.len() && raw_line[pos] != b' ' {
            pos += 1;
        }
        while pos < raw_line.len() && raw_line[pos] == b' ' {
            pos += 1;
        }
    }

    if pos < raw_line.len() && raw_line[pos] == b':' {
        while pos < raw_line.len() && raw_line[pos] != b' ' {
            pos += 1;
        }
        while pos < raw_line.len() && raw_line[pos] == b' ' {
            pos += 1;
        }
    }

    let start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > start {
        String::from_utf8(raw_line[start..pos].to_vec()).ok()
    } else {
        None
    }
}

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a received line.
    #[error("invalid UTF-8 in line at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the UTF-8 decoder.
        details: String,
        /// Command token recovered from the raw bytes, if any.
        command_hint: Option<String>,
    },

    /// Line exceeded the maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Failed to parse a protocol line.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing a single protocol line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty or only whitespace.
    #[error("empty message")]
    EmptyMessage,

    /// Tag block was not followed by a space.
    #[error("invalid message tag format")]
    UnterminatedTags,

    /// Prefix was not followed by a space.
    #[error("invalid message prefix format")]
    UnterminatedPrefix,

    /// Nothing followed the tag block and prefix.
    #[error("missing command")]
    MissingCommand,
}
