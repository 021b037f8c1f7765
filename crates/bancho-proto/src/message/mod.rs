//! Protocol line types and parsing.

mod parse;
mod types;

pub use self::types::RawMessage;
