//! Protocol codec for tokio.
//!
//! Wraps [`LineCodec`] and parses each received line into a [`RawMessage`].

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};
use crate::line::LineCodec;
use crate::message::RawMessage;

/// Tokio codec yielding [`RawMessage`]s and writing sanitized lines.
///
/// Blank lines are skipped. A line that fails to parse is returned as
/// [`ProtocolError::InvalidMessage`]; callers treat that as a corrupt stream.
#[derive(Default)]
pub struct RawCodec {
    inner: LineCodec,
}

impl RawCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }

    /// Sanitize outgoing text: cut at the first CR or LF so one send can
    /// never produce more than one protocol line.
    pub fn sanitize(mut line: String) -> String {
        if let Some(pos) = line.find(['\r', '\n']) {
            line.truncate(pos);
        }
        line
    }
}

impl Decoder for RawCodec {
    type Item = RawMessage;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<RawMessage>> {
        loop {
            let Some(line) = self.inner.decode(src)? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            return line.parse::<RawMessage>().map(Some);
        }
    }
}

impl Encoder<String> for RawCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        self.inner.encode(Self::sanitize(line), dst)
    }
}
