use std::collections::HashMap;
use std::fmt;

/// One parsed protocol line.
///
/// Immutable once parsed. The original text is kept verbatim (minus the line
/// terminator) so it can be logged or re-emitted exactly as received.
///
/// # Example
///
/// ```
/// use bancho_proto::RawMessage;
///
/// let msg = RawMessage::parse("@time=1 :cho.ppy.sh 332 me #osu :topic here").unwrap();
/// assert_eq!(msg.tag_value("time"), Some("1"));
/// assert_eq!(msg.prefix(), Some("cho.ppy.sh"));
/// assert_eq!(msg.command(), "332");
/// assert_eq!(msg.param(1), Some("#osu"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMessage {
    pub(super) raw: String,
    pub(super) tags: Option<HashMap<String, String>>,
    pub(super) prefix: Option<String>,
    pub(super) command: String,
    pub(super) params: Vec<String>,
}

impl RawMessage {
    /// The original line, without its terminator.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tag map, if the line carried a tag block.
    pub fn tags(&self) -> Option<&HashMap<String, String>> {
        self.tags.as_ref()
    }

    /// Value of a single tag. Tags given without `=` report `"true"`.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }

    /// Sender prefix without the leading `:`.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Nickname part of the prefix (everything before the first `!`).
    pub fn source_nickname(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        let nick = prefix.split('!').next().unwrap_or(prefix);
        if nick.is_empty() {
            None
        } else {
            Some(nick)
        }
    }

    /// Command token, e.g. `PRIVMSG` or `001`.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// All parameters in order; the last may contain spaces.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Whether the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
