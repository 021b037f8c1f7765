use parking_lot::RwLock;

use super::PrivateMessage;

/// A conversation: a `#channel` or a one-to-one query, keyed by name.
///
/// Keeps an append-only log of messages seen in both directions unless
/// logging was disabled when the channel was created.
#[derive(Debug)]
pub struct Channel {
    name: String,
    save_messages: bool,
    messages: RwLock<Vec<PrivateMessage>>,
}

impl Channel {
    pub fn new(name: impl Into<String>, save_messages: bool) -> Self {
        Self {
            name: name.into(),
            save_messages,
            messages: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether messages are recorded.
    pub fn saves_messages(&self) -> bool {
        self.save_messages
    }

    /// Append to the log. Ignored when logging is disabled.
    pub fn add_message(&self, message: PrivateMessage) {
        if self.save_messages {
            self.messages.write().push(message);
        }
    }

    /// Copy of the log, oldest first.
    pub fn messages(&self) -> Vec<PrivateMessage> {
        self.messages.read().clone()
    }

    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }
}
