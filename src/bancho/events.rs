use std::sync::Arc;

use async_trait::async_trait;
use bancho_proto::RawMessage;

use super::{BanchoClient, Channel, PrivateMessage};

/// Observer of Bancho events.
///
/// Methods default to no-ops. Like [`crate::irc::IrcEventHandler`], inbound
/// events are delivered on the read loop in subscription order.
#[async_trait]
pub trait BanchoEventHandler: Send + Sync {
    async fn on_connected(&self, _client: &BanchoClient) {}

    async fn on_authenticated(&self, _client: &BanchoClient) {}

    /// A line was written to the server.
    async fn on_irc_command_executed(&self, _client: &BanchoClient, _line: &str) {}

    /// Any line received, after the adapter processed it.
    async fn on_irc_message(&self, _client: &BanchoClient, _message: &RawMessage) {}

    /// A `PRIVMSG` arrived, before it is logged to its channel.
    async fn on_private_message(&self, _client: &BanchoClient, _message: &PrivateMessage) {}

    /// A channel was seen for the first time.
    async fn on_channel_joined(&self, _client: &BanchoClient, _channel: &Arc<Channel>) {}
}
