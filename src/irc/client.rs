use std::fmt;
use std::sync::Arc;

use bancho_proto::{Command, RawCodec, RawMessage, Response};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use super::{ConnectionState, IrcEventHandler};
use crate::error::{ClientError, ClientResult};
use crate::observer::ObserverList;
use crate::telemetry::spans;

type Reader = FramedRead<OwnedReadHalf, RawCodec>;
type Writer = FramedWrite<OwnedWriteHalf, RawCodec>;

/// Connection parameters.
#[derive(Clone)]
pub struct IrcConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Nickname sent with `NICK`.
    pub nickname: String,
    /// Username sent with `USER`.
    pub username: String,
    /// Server password sent with `PASS`.
    pub password: String,
}

impl fmt::Debug for IrcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrcConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("nickname", &self.nickname)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Client side of one IRC connection.
pub struct IrcClient {
    config: IrcConfig,
    session: Mutex<Session>,
    writer: tokio::sync::Mutex<Option<SessionWriter>>,
    observers: ObserverList<dyn IrcEventHandler>,
}

/// Lifecycle state and the session that owns it.
///
/// Every `connect` takes a new id. Teardown only applies while the id still
/// matches, so a session that ends late cannot close its successor.
#[derive(Default)]
struct Session {
    state: ConnectionState,
    id: u64,
    /// Stops the running read loop; a child of the token passed to `connect`.
    token: Option<CancellationToken>,
}

struct SessionWriter {
    session: u64,
    framed: Writer,
}

impl IrcClient {
    /// Create a disconnected client.
    pub fn new(config: IrcConfig) -> Self {
        Self {
            config,
            session: Mutex::new(Session::default()),
            writer: tokio::sync::Mutex::new(None),
            observers: ObserverList::new(),
        }
    }

    /// Connection parameters.
    pub fn config(&self) -> &IrcConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.session.lock().state
    }

    /// Whether a stream is open.
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Whether the server has confirmed registration.
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Register an observer. Observers run in subscription order.
    pub fn subscribe(&self, handler: Arc<dyn IrcEventHandler>) {
        self.observers.subscribe(handler);
    }

    /// Open the connection, register, and run the read loop until the
    /// session ends.
    ///
    /// Returns `Ok(())` when the loop stops through [`disconnect`](Self::disconnect)
    /// or `cancel`. Does nothing if a connection is already open or opening.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authentication`] when the server answers 464
    /// - [`ClientError::Network`] on socket failure or when the server closes the stream
    /// - [`ClientError::Protocol`] when a received line is malformed
    /// - [`ClientError::Cancelled`] when `cancel` fires before the stream is open
    pub async fn connect(&self, cancel: &CancellationToken) -> ClientResult {
        let id = {
            let mut session = self.session.lock();
            if session.state != ConnectionState::Disconnected {
                debug!(state = ?session.state, "Connect requested while already active");
                return Ok(());
            }
            session.id += 1;
            session.state = ConnectionState::Connecting;
            session.token = None;
            session.id
        };

        let span = spans::connection(&self.config.host, self.config.port, &self.config.nickname);
        async {
            let _guard = SessionGuard { client: self, id };
            let result = self.run_session(id, cancel).await;
            self.release(id).await;
            match &result {
                Ok(()) => info!("Disconnected"),
                Err(e) => warn!(error = %e, code = e.error_code(), "Connection ended with error"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_session(&self, id: u64, cancel: &CancellationToken) -> ClientResult {
        info!("Connecting");
        let stream = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            stream = TcpStream::connect((self.config.host.as_str(), self.config.port)) => stream?,
        };
        let (read_half, write_half) = stream.into_split();

        let session = cancel.child_token();
        *self.writer.lock().await = Some(SessionWriter {
            session: id,
            framed: FramedWrite::new(write_half, RawCodec::new()),
        });
        {
            let mut slot = self.session.lock();
            slot.token = Some(session.clone());
            slot.state = ConnectionState::Connected;
        }
        info!("Connected");
        self.emit_connected(&session).await;

        let mut reader = FramedRead::new(read_half, RawCodec::new());

        self.send(Command::PASS(self.config.password.clone()), &session).await?;
        self.send(Command::NICK(self.config.nickname.clone()), &session).await?;
        self.send(Command::USER(self.config.username.clone()), &session).await?;

        self.read_loop(id, &mut reader, &session).await
    }

    async fn read_loop(
        &self,
        id: u64,
        reader: &mut Reader,
        session: &CancellationToken,
    ) -> ClientResult {
        loop {
            let next = tokio::select! {
                biased;
                _ = session.cancelled() => return Ok(()),
                next = reader.next() => next,
            };

            let message = match next {
                Some(Ok(message)) => message,
                Some(Err(e)) => return Err(e.into()),
                None if session.is_cancelled() => return Ok(()),
                None => {
                    return Err(ClientError::Network(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "server closed the connection",
                    )));
                }
            };

            debug!(line = %message, "<<");
            self.handle_message(id, &message, session).await?;
        }
    }

    async fn handle_message(
        &self,
        id: u64,
        message: &RawMessage,
        session: &CancellationToken,
    ) -> ClientResult {
        match Response::from_command(message.command()) {
            Some(Response::ERR_PASSWDMISMATCH) => {
                warn!("Server rejected credentials");
                if let Err(e) = self.close(id, session).await {
                    debug!(error = %e, "QUIT after rejected credentials failed");
                }
                return Err(ClientError::Authentication);
            }
            Some(Response::RPL_WELCOME) => {
                if self.mark_authenticated(id) {
                    info!("Authenticated");
                    self.emit_authenticated(session).await;
                }
            }
            _ => {}
        }

        if message.command() == "PING" {
            let token = message.param(0).map(str::to_owned);
            self.send(Command::PONG(token), session).await?;
        }

        self.emit_message(message, session).await;
        Ok(())
    }

    /// Send `QUIT`, close the stream and stop the read loop.
    ///
    /// Does nothing if no connection is open. The stream is released even if
    /// the `QUIT` cannot be written.
    pub async fn disconnect(&self, cancel: &CancellationToken) -> ClientResult {
        let id = {
            let session = self.session.lock();
            if !session.state.is_connected() {
                return Ok(());
            }
            session.id
        };
        self.close(id, cancel).await
    }

    async fn close(&self, id: u64, cancel: &CancellationToken) -> ClientResult {
        let quit = self.send(Command::QUIT(None), cancel).await;
        self.release(id).await;
        quit
    }

    /// Join a channel (`#name`) or open a one-to-one conversation with a user.
    pub async fn join_channel(&self, name: &str, cancel: &CancellationToken) -> ClientResult {
        let command = if name.starts_with('#') {
            Command::JOIN(name.to_string())
        } else {
            Command::QUERY(name.to_string())
        };
        self.send(command, cancel).await
    }

    /// Send a `PRIVMSG` to a channel or user.
    pub async fn send_private_message(
        &self,
        target: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> ClientResult {
        self.send(Command::PRIVMSG(target.to_string(), content.to_string()), cancel)
            .await
    }

    /// Write one command to the server.
    ///
    /// Embedded line breaks are cut off before writing. Sending while
    /// disconnected is a logged no-op. A write failure tears the connection
    /// down and stops the read loop.
    ///
    /// `cancel` is honoured until the writer is acquired. After that the line
    /// is written and flushed in full, so a cancelled send never leaves part
    /// of a line queued for the next one.
    pub async fn send(&self, command: Command, cancel: &CancellationToken) -> ClientResult {
        let line = RawCodec::sanitize(command.to_string());

        {
            let mut guard = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                guard = self.writer.lock() => guard,
            };
            let Some(writer) = guard.as_mut() else {
                debug!(command = command.name(), "Not connected; dropping command");
                return Ok(());
            };

            if let Err(e) = writer.framed.send(line.clone()).await {
                let id = writer.session;
                *guard = None;
                drop(guard);
                self.end_session(id);
                return Err(e.into());
            }
        }

        debug!(line = %loggable(&command, &line), ">>");
        for observer in self.observers.snapshot() {
            observer.on_command_executed(self, &line).await;
        }
        Ok(())
    }

    /// Transition `Connected -> Authenticated`; false if already
    /// authenticated or `id` is no longer the current session.
    fn mark_authenticated(&self, id: u64) -> bool {
        let mut session = self.session.lock();
        if session.id == id && session.state == ConnectionState::Connected {
            session.state = ConnectionState::Authenticated;
            true
        } else {
            false
        }
    }

    /// Cancel the read loop and mark the client disconnected, if session
    /// `id` is still current.
    fn end_session(&self, id: u64) {
        let mut session = self.session.lock();
        if session.id != id {
            return;
        }
        if let Some(token) = session.token.take() {
            token.cancel();
        }
        session.state = ConnectionState::Disconnected;
    }

    /// Drop session `id`'s writer and end it.
    async fn release(&self, id: u64) {
        {
            let mut writer = self.writer.lock().await;
            if writer.as_ref().is_some_and(|w| w.session == id) {
                writer.take();
            }
        }
        self.end_session(id);
    }

    async fn emit_connected(&self, session: &CancellationToken) {
        for observer in self.observers.snapshot() {
            if session.is_cancelled() {
                break;
            }
            observer.on_connected(self).await;
        }
    }

    async fn emit_authenticated(&self, session: &CancellationToken) {
        for observer in self.observers.snapshot() {
            if session.is_cancelled() {
                break;
            }
            observer.on_authenticated(self).await;
        }
    }

    async fn emit_message(&self, message: &RawMessage, session: &CancellationToken) {
        for observer in self.observers.snapshot() {
            if session.is_cancelled() {
                break;
            }
            observer.on_message(self, message).await;
        }
    }
}

impl fmt::Debug for IrcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrcClient")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Releases the session if the `connect` future is dropped mid-flight.
struct SessionGuard<'a> {
    client: &'a IrcClient,
    id: u64,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.client.writer.try_lock() {
            if writer.as_ref().is_some_and(|w| w.session == self.id) {
                writer.take();
            }
        }
        self.client.end_session(self.id);
    }
}

fn loggable<'a>(command: &Command, line: &'a str) -> &'a str {
    match command {
        Command::PASS(_) => "PASS ****",
        _ => line,
    }
}
