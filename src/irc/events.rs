use async_trait::async_trait;
use bancho_proto::RawMessage;

use super::IrcClient;

/// Observer of connection-level events.
///
/// Every method defaults to a no-op so implementors only override what they
/// need. Inbound events run on the read loop, one observer at a time; a slow
/// observer delays the next line (and the next `PONG`), so long work belongs
/// on a spawned task.
#[async_trait]
pub trait IrcEventHandler: Send + Sync {
    /// The TCP stream was opened; the handshake has not been sent yet.
    async fn on_connected(&self, _client: &IrcClient) {}

    /// The server confirmed registration (001). Fires once per connection.
    async fn on_authenticated(&self, _client: &IrcClient) {}

    /// A line was written to the server (text without CR LF).
    async fn on_command_executed(&self, _client: &IrcClient, _line: &str) {}

    /// A line was received, after built-in handling (`PONG`, state changes).
    async fn on_message(&self, _client: &IrcClient, _message: &RawMessage) {}
}
