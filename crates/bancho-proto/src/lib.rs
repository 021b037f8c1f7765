//! # bancho-proto
//!
//! Parsing and serialization for the line-based IRC dialect spoken by the
//! osu! Bancho gateway (`irc.ppy.sh`).
//!
//! ## Features
//!
//! - Strict left-to-right parser for tags, prefix, command and parameters
//! - Serializer for the handful of commands a Bancho client sends
//! - Numeric reply codes the client reacts to
//! - Optional Tokio codecs for framed reading and writing
//!
//! ## Parsing
//!
//! ```rust
//! use bancho_proto::RawMessage;
//!
//! let msg: RawMessage = ":peppy!cho@ppy.sh PRIVMSG #osu :hello there".parse().unwrap();
//! assert_eq!(msg.command(), "PRIVMSG");
//! assert_eq!(msg.source_nickname(), Some("peppy"));
//! assert_eq!(msg.params(), ["#osu", "hello there"]);
//! ```
//!
//! ## Building commands
//!
//! ```rust
//! use bancho_proto::Command;
//!
//! let line = Command::PRIVMSG("#osu".into(), "hi all".into()).to_string();
//! assert_eq!(line, "PRIVMSG #osu :hi all");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod message;
pub mod response;

#[cfg(feature = "tokio")]
pub mod codec;
#[cfg(feature = "tokio")]
pub mod line;

pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::message::RawMessage;
pub use self::response::Response;

#[cfg(feature = "tokio")]
pub use self::codec::RawCodec;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;

/// Maximum accepted line length in bytes, including the line terminator.
pub const MAX_LINE_LEN: usize = 8191;
