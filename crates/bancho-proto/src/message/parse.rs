//! Strict left-to-right line scanner.
//!
//! `[@tags SP] [:prefix SP] command {SP param} [SP :trailing]`
//!
//! Runs of spaces between components are tolerated. A tag block or prefix
//! that is not terminated by a space is an error; everything else degrades
//! gracefully (no prefix, no tags, no parameters).

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};

use super::types::RawMessage;

/// Tag value reported for tags given without `=`.
const IMPLICIT_TAG_VALUE: &str = "true";

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos] == b' ' {
        pos += 1;
    }
    pos
}

fn find_space(line: &str, from: usize) -> Option<usize> {
    line[from..].find(' ').map(|offset| from + offset)
}

fn parse_tags(block: &str) -> HashMap<String, String> {
    block
        .split(';')
        .filter(|tag| !tag.is_empty())
        .map(|tag| match tag.split_once('=') {
            Some((key, value)) => (key.to_owned(), value.to_owned()),
            None => (tag.to_owned(), IMPLICIT_TAG_VALUE.to_owned()),
        })
        .collect()
}

impl RawMessage {
    /// Parse one protocol line. A trailing CR LF (or bare LF) is ignored.
    pub fn parse(line: &str) -> Result<Self, MessageParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let bytes = line.as_bytes();
        let mut pos = 0;

        let mut tags = None;
        if bytes[0] == b'@' {
            let end = find_space(line, 0).ok_or(MessageParseError::UnterminatedTags)?;
            tags = Some(parse_tags(&line[1..end]));
            pos = end + 1;
        }

        pos = skip_spaces(bytes, pos);

        let mut prefix = None;
        if pos < bytes.len() && bytes[pos] == b':' {
            let end = find_space(line, pos).ok_or(MessageParseError::UnterminatedPrefix)?;
            prefix = Some(line[pos + 1..end].to_owned());
            pos = skip_spaces(bytes, end + 1);
        }

        if pos >= bytes.len() {
            return Err(MessageParseError::MissingCommand);
        }

        let mut params = Vec::new();
        let command = match find_space(line, pos) {
            None => line[pos..].to_owned(),
            Some(end) => {
                let command = line[pos..end].to_owned();
                pos = skip_spaces(bytes, end + 1);

                while pos < bytes.len() {
                    if bytes[pos] == b':' {
                        params.push(line[pos + 1..].to_owned());
                        break;
                    }

                    match find_space(line, pos) {
                        None => {
                            params.push(line[pos..].to_owned());
                            break;
                        }
                        Some(end) => {
                            params.push(line[pos..end].to_owned());
                            pos = skip_spaces(bytes, end + 1);
                        }
                    }
                }

                command
            }
        };

        Ok(RawMessage {
            raw: line.to_owned(),
            tags,
            prefix,
            command,
            params,
        })
    }
}

impl FromStr for RawMessage {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RawMessage::parse(s).map_err(|cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        })
    }
}
