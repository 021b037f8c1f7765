use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use bancho_proto::{RawCodec, RawMessage, Response};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{BanchoEventHandler, Channel, DEFAULT_HOST, DEFAULT_PORT, PrivateMessage};
use crate::error::ClientResult;
use crate::irc::{ConnectionState, IrcClient, IrcConfig, IrcEventHandler};
use crate::observer::ObserverList;

/// Credentials and connection settings for Bancho.
///
/// The IRC password comes from <https://osu.ppy.sh/home/account/edit#legacy-api>,
/// not the account password.
#[derive(Clone)]
pub struct BanchoConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Whether channels keep a message log.
    pub save_messages: bool,
}

impl BanchoConfig {
    /// Settings for the public Bancho server.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            save_messages: true,
        }
    }
}

impl fmt::Debug for BanchoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BanchoConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("save_messages", &self.save_messages)
            .finish()
    }
}

/// Handle to a Bancho session.
///
/// Cloning is cheap; every clone drives the same connection and sees the same
/// channels, so command handlers can keep one around.
#[derive(Clone)]
pub struct BanchoClient {
    inner: Arc<Inner>,
}

struct Inner {
    irc: IrcClient,
    username: String,
    save_messages: bool,
    channels: Mutex<HashMap<String, Arc<Channel>>>,
    observers: ObserverList<dyn BanchoEventHandler>,
}

impl BanchoClient {
    pub fn new(config: BanchoConfig) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let irc = IrcClient::new(IrcConfig {
                host: config.host,
                port: config.port,
                nickname: config.username.clone(),
                username: config.username.clone(),
                password: config.password,
            });
            irc.subscribe(Arc::new(Adapter {
                inner: weak.clone(),
            }));
            Inner {
                irc,
                username: config.username,
                save_messages: config.save_messages,
                channels: Mutex::new(HashMap::new()),
                observers: ObserverList::new(),
            }
        });
        Self { inner }
    }

    /// Our own nickname.
    pub fn username(&self) -> &str {
        &self.inner.username
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.irc.state()
    }

    /// The underlying connection.
    pub fn irc(&self) -> &IrcClient {
        &self.inner.irc
    }

    /// Register an observer. Observers run in subscription order.
    pub fn subscribe(&self, handler: Arc<dyn BanchoEventHandler>) {
        self.inner.observers.subscribe(handler);
    }

    /// Connect and run the session until it ends. See [`IrcClient::connect`].
    pub async fn connect(&self, cancel: &CancellationToken) -> ClientResult {
        self.inner.irc.connect(cancel).await
    }

    pub async fn disconnect(&self, cancel: &CancellationToken) -> ClientResult {
        self.inner.irc.disconnect(cancel).await
    }

    /// Join `#channel` or open a query with a user, unless already known.
    pub async fn join_channel(&self, name: &str, cancel: &CancellationToken) -> ClientResult {
        if self.inner.channels.lock().contains_key(name) {
            debug!(channel = %name, "Already in channel");
            return Ok(());
        }
        self.inner.irc.join_channel(name, cancel).await
    }

    /// Send a message and record it in the target's log if the channel is known.
    pub async fn send_private_message(
        &self,
        target: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> ClientResult {
        // The log keeps what actually went out on the wire.
        let content = RawCodec::sanitize(content.to_string());
        self.inner
            .irc
            .send_private_message(target, &content, cancel)
            .await?;

        if let Some(channel) = self.channel(target) {
            channel.add_message(PrivateMessage::new(&self.inner.username, content, target));
        }
        Ok(())
    }

    pub fn channel(&self, name: &str) -> Option<Arc<Channel>> {
        self.inner.channels.lock().get(name).cloned()
    }

    /// All known channels, in no particular order.
    pub fn channels(&self) -> Vec<Arc<Channel>> {
        self.inner.channels.lock().values().cloned().collect()
    }

    /// Fetch a channel, creating it and announcing the join if it is new.
    async fn get_or_create_channel(&self, name: &str) -> Arc<Channel> {
        let (channel, created) = {
            let mut channels = self.inner.channels.lock();
            match channels.get(name) {
                Some(channel) => (Arc::clone(channel), false),
                None => {
                    let channel = Arc::new(Channel::new(name, self.inner.save_messages));
                    channels.insert(name.to_string(), Arc::clone(&channel));
                    (channel, true)
                }
            }
        };

        if created {
            info!(channel = %name, "Joined channel");
            for observer in self.inner.observers.snapshot() {
                observer.on_channel_joined(self, &channel).await;
            }
        }
        channel
    }

    async fn handle_message(&self, raw: &RawMessage) {
        if raw.command() == "PRIVMSG" {
            match PrivateMessage::try_from(raw) {
                Ok(message) => self.handle_private_message(message).await,
                Err(e) => warn!(error = %e, line = %raw, "Skipping malformed PRIVMSG"),
            }
        } else if Response::from_command(raw.command()) == Some(Response::RPL_TOPIC) {
            match raw.param(1) {
                Some(name) => {
                    self.get_or_create_channel(name).await;
                }
                None => warn!(line = %raw, "Topic reply without a channel"),
            }
        }

        for observer in self.inner.observers.snapshot() {
            observer.on_irc_message(self, raw).await;
        }
    }

    async fn handle_private_message(&self, message: PrivateMessage) {
        for observer in self.inner.observers.snapshot() {
            observer.on_private_message(self, &message).await;
        }
        let channel = self.get_or_create_channel(message.reply_target()).await;
        channel.add_message(message);
    }
}

impl fmt::Debug for BanchoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BanchoClient")
            .field("username", &self.inner.username)
            .field("state", &self.state())
            .field("channels", &self.inner.channels.lock().len())
            .finish()
    }
}

/// Bridges connection events into the Bancho layer.
///
/// Holds a weak reference; the connection is owned by the client it reports to.
struct Adapter {
    inner: Weak<Inner>,
}

impl Adapter {
    fn client(&self) -> Option<BanchoClient> {
        self.inner.upgrade().map(|inner| BanchoClient { inner })
    }
}

#[async_trait]
impl IrcEventHandler for Adapter {
    async fn on_connected(&self, _irc: &IrcClient) {
        let Some(client) = self.client() else { return };
        for observer in client.inner.observers.snapshot() {
            observer.on_connected(&client).await;
        }
    }

    async fn on_authenticated(&self, _irc: &IrcClient) {
        let Some(client) = self.client() else { return };
        for observer in client.inner.observers.snapshot() {
            observer.on_authenticated(&client).await;
        }
    }

    async fn on_command_executed(&self, _irc: &IrcClient, line: &str) {
        let Some(client) = self.client() else { return };
        for observer in client.inner.observers.snapshot() {
            observer.on_irc_command_executed(&client, line).await;
        }
    }

    async fn on_message(&self, _irc: &IrcClient, message: &RawMessage) {
        let Some(client) = self.client() else { return };
        client.handle_message(message).await;
    }
}
