//! Records client events for assertions.

use async_trait::async_trait;
use bancho_irc::bancho_proto::RawMessage;
use bancho_irc::{BanchoClient, BanchoEventHandler, Channel, PrivateMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// An observed event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Connected,
    Authenticated,
    Executed(String),
    Message(String),
    PrivateMessage(PrivateMessage),
    ChannelJoined(String),
}

/// Forwards every event into a channel.
pub struct Recorder {
    tx: mpsc::UnboundedSender<Event>,
}

#[allow(dead_code)]
impl Recorder {
    /// Subscribe a recorder to `client` and return the receiving end.
    pub fn attach(client: &BanchoClient) -> Events {
        let (tx, rx) = mpsc::unbounded_channel();
        client.subscribe(Arc::new(Self { tx }));
        Events { rx }
    }

    fn record(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

#[async_trait]
impl BanchoEventHandler for Recorder {
    async fn on_connected(&self, _client: &BanchoClient) {
        self.record(Event::Connected);
    }

    async fn on_authenticated(&self, _client: &BanchoClient) {
        self.record(Event::Authenticated);
    }

    async fn on_irc_command_executed(&self, _client: &BanchoClient, line: &str) {
        self.record(Event::Executed(line.to_string()));
    }

    async fn on_irc_message(&self, _client: &BanchoClient, message: &RawMessage) {
        self.record(Event::Message(message.to_string()));
    }

    async fn on_private_message(&self, _client: &BanchoClient, message: &PrivateMessage) {
        self.record(Event::PrivateMessage(message.clone()));
    }

    async fn on_channel_joined(&self, _client: &BanchoClient, channel: &Arc<Channel>) {
        self.record(Event::ChannelJoined(channel.name().to_string()));
    }
}

/// Receiving end of a [`Recorder`].
pub struct Events {
    rx: mpsc::UnboundedReceiver<Event>,
}

#[allow(dead_code)]
impl Events {
    /// Collect events up to and including the first one matching `done`.
    pub async fn until<F>(&mut self, mut done: F) -> anyhow::Result<Vec<Event>>
    where
        F: FnMut(&Event) -> bool,
    {
        let mut seen = Vec::new();
        loop {
            let event = timeout(Duration::from_secs(5), self.rx.recv())
                .await?
                .ok_or_else(|| anyhow::anyhow!("recorder dropped"))?;
            let finished = done(&event);
            seen.push(event);
            if finished {
                return Ok(seen);
            }
        }
    }

    /// Events already delivered, without waiting.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut seen = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            seen.push(event);
        }
        seen
    }
}
