//! Integration tests for the connection lifecycle.
//!
//! Each test drives a real client against the in-process mock server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bancho_irc::{BanchoClient, BanchoEventHandler, ClientError, ConnectionState, PrivateMessage};
use common::{Event, MockServer, Recorder, config};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

fn spawn_connect(
    client: &BanchoClient,
    cancel: &CancellationToken,
) -> tokio::task::JoinHandle<Result<(), ClientError>> {
    let client = client.clone();
    let cancel = cancel.clone();
    tokio::spawn(async move { client.connect(&cancel).await })
}

#[tokio::test]
async fn test_handshake_and_single_authentication() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let mut events = Recorder::attach(&client);
    let cancel = CancellationToken::new();
    let task = spawn_connect(&client, &cancel);

    let mut conn = server.accept().await.unwrap();
    conn.expect_handshake().await.unwrap();
    conn.welcome().await.unwrap();
    conn.welcome().await.unwrap();
    conn.send_raw("PING :sync").await.unwrap();
    assert_eq!(conn.recv().await.unwrap(), "PONG :sync");

    let seen = events
        .until(|e| *e == Event::Message("PING :sync".into()))
        .await
        .unwrap();
    assert_eq!(seen[0], Event::Connected);
    assert_eq!(
        &seen[1..4],
        [
            Event::Executed("PASS secret".into()),
            Event::Executed("NICK tester".into()),
            Event::Executed("USER tester 0 * :tester".into()),
        ]
    );
    let authenticated = seen.iter().filter(|e| **e == Event::Authenticated).count();
    assert_eq!(authenticated, 1);
    assert_eq!(client.state(), ConnectionState::Authenticated);

    client.disconnect(&cancel).await.unwrap();
    assert_eq!(conn.recv().await.unwrap(), "QUIT");
    task.await.unwrap().unwrap();
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_rejected_password_fails_connect() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let mut events = Recorder::attach(&client);
    let task = spawn_connect(&client, &CancellationToken::new());

    let mut conn = server.accept_registered().await.unwrap();
    conn.send_raw(":cho.ppy.sh 464 tester :Bad authentication token.")
        .await
        .unwrap();

    assert_eq!(conn.recv().await.unwrap(), "QUIT");
    let result = task.await.unwrap();
    assert!(matches!(result, Err(ClientError::Authentication)), "{result:?}");
    assert_eq!(client.state(), ConnectionState::Disconnected);

    let seen = events.drain();
    assert!(!seen.contains(&Event::Authenticated));
    assert!(!seen.iter().any(|e| matches!(e, Event::Message(_))));
}

#[tokio::test]
async fn test_ping_answered_before_next_line() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let mut events = Recorder::attach(&client);
    let cancel = CancellationToken::new();
    let task = spawn_connect(&client, &cancel);

    let mut conn = server.accept_registered().await.unwrap();
    conn.welcome().await.unwrap();
    conn.send_raw("PING cho.ppy.sh").await.unwrap();
    conn.send_raw(":peppy!cho@ppy.sh PRIVMSG #osu :after ping")
        .await
        .unwrap();

    assert_eq!(conn.recv().await.unwrap(), "PONG :cho.ppy.sh");

    let seen = events
        .until(|e| matches!(e, Event::PrivateMessage(_)))
        .await
        .unwrap();
    let position = |wanted: &Event| seen.iter().position(|e| e == wanted).unwrap();
    let pong = position(&Event::Executed("PONG :cho.ppy.sh".into()));
    let ping = position(&Event::Message("PING cho.ppy.sh".into()));
    assert!(pong < ping);
    assert_eq!(
        seen.iter()
            .filter(|e| matches!(e, Event::Executed(line) if line.starts_with("PONG")))
            .count(),
        1
    );

    cancel.cancel();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cancellation_releases_stream() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let mut events = Recorder::attach(&client);
    let cancel = CancellationToken::new();
    let task = spawn_connect(&client, &cancel);

    let mut conn = server.accept_registered().await.unwrap();
    conn.welcome().await.unwrap();
    events
        .until(|e| matches!(e, Event::Message(line) if line.contains(" 001 ")))
        .await
        .unwrap();

    cancel.cancel();
    task.await.unwrap().unwrap();

    assert!(conn.closed().await.unwrap());
    assert_eq!(client.state(), ConnectionState::Disconnected);

    // Sending after the session ended is a no-op.
    client
        .send_private_message("#osu", "late", &CancellationToken::new())
        .await
        .unwrap();
    assert!(events.drain().is_empty());
}

/// Cancels the session when it sees a `stop` message.
struct StopOn {
    cancel: CancellationToken,
}

#[async_trait]
impl BanchoEventHandler for StopOn {
    async fn on_private_message(&self, _client: &BanchoClient, message: &PrivateMessage) {
        if message.content() == "stop" {
            self.cancel.cancel();
        }
    }
}

#[tokio::test]
async fn test_no_events_after_cancellation() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let mut events = Recorder::attach(&client);
    let cancel = CancellationToken::new();
    client.subscribe(Arc::new(StopOn {
        cancel: cancel.clone(),
    }));
    let task = spawn_connect(&client, &cancel);

    let mut conn = server.accept_registered().await.unwrap();
    conn.welcome().await.unwrap();
    conn.send_raw(":peppy!cho@ppy.sh PRIVMSG #osu :stop")
        .await
        .unwrap();
    conn.send_raw(":peppy!cho@ppy.sh PRIVMSG #osu :after")
        .await
        .unwrap();

    task.await.unwrap().unwrap();
    assert!(conn.closed().await.unwrap());

    let seen = events.drain();
    assert!(seen.contains(&Event::PrivateMessage(PrivateMessage::new(
        "peppy", "stop", "#osu"
    ))));
    assert!(!seen.iter().any(|e| match e {
        Event::Message(line) => line.ends_with(":after"),
        Event::PrivateMessage(message) => message.content() == "after",
        _ => false,
    }));
}

#[tokio::test]
async fn test_concurrent_sends_keep_lines_whole() {
    const SENDERS: u8 = 8;
    const PER_SENDER: usize = 20;
    const WIDTH: usize = 400;

    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let cancel = CancellationToken::new();
    let task = spawn_connect(&client, &cancel);

    let mut conn = server.accept_registered().await.unwrap();
    conn.welcome().await.unwrap();
    while !client.state().is_authenticated() {
        tokio::task::yield_now().await;
    }

    let senders: Vec<_> = (0..SENDERS)
        .map(|i| {
            let client = client.clone();
            let cancel = cancel.clone();
            let content = char::from(b'a' + i).to_string().repeat(WIDTH);
            tokio::spawn(async move {
                for _ in 0..PER_SENDER {
                    client
                        .send_private_message("#osu", &content, &cancel)
                        .await
                        .unwrap();
                }
            })
        })
        .collect();

    let mut counts = [0usize; SENDERS as usize];
    for _ in 0..SENDERS as usize * PER_SENDER {
        let line = conn.recv().await.unwrap();
        let content = line.strip_prefix("PRIVMSG #osu :").unwrap();
        assert_eq!(content.len(), WIDTH, "{line}");
        let first = content.as_bytes()[0];
        assert!(content.bytes().all(|b| b == first), "interleaved: {line}");
        counts[usize::from(first - b'a')] += 1;
    }
    assert_eq!(counts, [PER_SENDER; SENDERS as usize]);

    for sender in senders {
        sender.await.unwrap();
    }
    cancel.cancel();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cancelled_send_writes_nothing() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let cancel = CancellationToken::new();
    let task = spawn_connect(&client, &cancel);

    let mut conn = server.accept_registered().await.unwrap();
    conn.welcome().await.unwrap();
    while !client.state().is_authenticated() {
        tokio::task::yield_now().await;
    }

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let result = client
        .send_private_message("#osu", "dropped", &cancelled)
        .await;
    assert!(matches!(result, Err(ClientError::Cancelled)), "{result:?}");

    client
        .send_private_message("#osu", "kept", &cancel)
        .await
        .unwrap();
    assert_eq!(conn.recv().await.unwrap(), "PRIVMSG #osu :kept");

    cancel.cancel();
    task.await.unwrap().unwrap();
}

/// Blocks the read loop on a `slow` message until released.
struct SlowHandler {
    entered: Notify,
}

#[async_trait]
impl BanchoEventHandler for SlowHandler {
    async fn on_private_message(&self, _client: &BanchoClient, message: &PrivateMessage) {
        if message.content() == "slow" {
            self.entered.notify_one();
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
}

#[tokio::test]
async fn test_ending_session_spares_reconnected_one() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let mut events = Recorder::attach(&client);
    let slow = Arc::new(SlowHandler {
        entered: Notify::new(),
    });
    client.subscribe(slow.clone());
    let cancel = CancellationToken::new();
    let first = spawn_connect(&client, &cancel);

    let mut old = server.accept_registered().await.unwrap();
    old.welcome().await.unwrap();
    old.send_raw(":peppy!cho@ppy.sh PRIVMSG #osu :slow")
        .await
        .unwrap();
    slow.entered.notified().await;

    // The first read loop is still inside the handler.
    client.disconnect(&cancel).await.unwrap();
    assert_eq!(old.recv().await.unwrap(), "QUIT");
    assert_eq!(client.state(), ConnectionState::Disconnected);

    let second = spawn_connect(&client, &cancel);
    let mut conn = server.accept_registered().await.unwrap();
    conn.welcome().await.unwrap();
    conn.send_raw("PING :one").await.unwrap();
    assert_eq!(conn.recv().await.unwrap(), "PONG :one");
    let seen = events
        .until(|e| *e == Event::Message("PING :one".into()))
        .await
        .unwrap();
    assert_eq!(seen.iter().filter(|e| **e == Event::Authenticated).count(), 2);

    first.await.unwrap().unwrap();
    assert!(old.closed().await.unwrap());

    conn.send_raw("PING :two").await.unwrap();
    assert_eq!(conn.recv().await.unwrap(), "PONG :two");
    assert_eq!(client.state(), ConnectionState::Authenticated);

    client.disconnect(&cancel).await.unwrap();
    assert_eq!(conn.recv().await.unwrap(), "QUIT");
    second.await.unwrap().unwrap();
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_server_closing_stream_is_network_error() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let task = spawn_connect(&client, &CancellationToken::new());

    let conn = server.accept_registered().await.unwrap();
    conn.shutdown().await.unwrap();

    let result = task.await.unwrap();
    assert!(matches!(result, Err(ClientError::Network(_))), "{result:?}");
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_malformed_line_ends_session() {
    let server = MockServer::bind().await.unwrap();
    let client = BanchoClient::new(config(server.port()));
    let task = spawn_connect(&client, &CancellationToken::new());

    let mut conn = server.accept_registered().await.unwrap();
    conn.send_raw(":cho.ppy.sh").await.unwrap();

    let result = task.await.unwrap();
    assert!(matches!(result, Err(ClientError::Protocol(_))), "{result:?}");
    assert!(conn.closed().await.unwrap());
}

#[tokio::test]
async fn test_connect_refused_is_network_error() {
    let server = MockServer::bind().await.unwrap();
    let port = server.port();
    drop(server);

    let client = BanchoClient::new(config(port));
    let result = client.connect(&CancellationToken::new()).await;
    assert!(matches!(result, Err(ClientError::Network(_))), "{result:?}");
    assert_eq!(client.state(), ConnectionState::Disconnected);
}
