use bancho_proto::RawMessage;
use thiserror::Error;

use super::BANCHO_BOT;

/// A chat message sent to a channel or directly to a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateMessage {
    sender: String,
    content: String,
    recipient: String,
}

/// Why a raw line could not be read as a [`PrivateMessage`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidPrivateMessage {
    #[error("expected PRIVMSG, got {0}")]
    WrongCommand(String),

    #[error("PRIVMSG without a sender prefix")]
    MissingSender,

    #[error("PRIVMSG needs a recipient and text, got {0} parameters")]
    MissingParameters(usize),
}

impl PrivateMessage {
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            recipient: recipient.into(),
        }
    }

    /// Nickname of the author.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Message text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Target as written on the wire: a channel name or our own nickname.
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Whether the message was exchanged in a channel.
    pub fn is_channel_message(&self) -> bool {
        self.recipient.starts_with('#') || self.sender.starts_with('#')
    }

    /// Whether the server's bot account sent it.
    pub fn is_from_system_bot(&self) -> bool {
        self.sender == BANCHO_BOT
    }

    /// Where a reply should go: the channel, or the sender for direct messages.
    pub fn reply_target(&self) -> &str {
        if self.is_channel_message() {
            &self.recipient
        } else {
            &self.sender
        }
    }
}

impl TryFrom<&RawMessage> for PrivateMessage {
    type Error = InvalidPrivateMessage;

    fn try_from(raw: &RawMessage) -> Result<Self, Self::Error> {
        if raw.command() != "PRIVMSG" {
            return Err(InvalidPrivateMessage::WrongCommand(raw.command().to_string()));
        }
        let sender = raw
            .source_nickname()
            .ok_or(InvalidPrivateMessage::MissingSender)?;
        let [recipient, content, ..] = raw.params() else {
            return Err(InvalidPrivateMessage::MissingParameters(raw.params().len()));
        };
        Ok(Self::new(sender, content.as_str(), recipient.as_str()))
    }
}
