//! Mock Bancho server.
//!
//! Listens on an ephemeral port and hands out raw line access to each
//! accepted client.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A listening mock server.
pub struct MockServer {
    listener: TcpListener,
    port: u16,
}

impl MockServer {
    /// Bind to `127.0.0.1:0`.
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Wait for the client to connect.
    pub async fn accept(&self) -> anyhow::Result<ServerConnection> {
        let (stream, _) = timeout(RECV_TIMEOUT, self.listener.accept()).await??;
        let (read_half, writer) = stream.into_split();
        Ok(ServerConnection {
            reader: BufReader::new(read_half),
            writer,
        })
    }

    /// Accept and consume the `PASS`/`NICK`/`USER` handshake.
    pub async fn accept_registered(&self) -> anyhow::Result<ServerConnection> {
        let mut conn = self.accept().await?;
        conn.expect_handshake().await?;
        Ok(conn)
    }
}

/// Server side of one client connection.
pub struct ServerConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

#[allow(dead_code)]
impl ServerConnection {
    /// Send one line; CR LF is appended.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line without its terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("client closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Whether the client closes the stream (instead of sending more) within the timeout.
    pub async fn closed(&mut self) -> anyhow::Result<bool> {
        let mut line = String::new();
        let read = timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
        Ok(read == 0)
    }

    /// Check the registration lines and confirm them with 001.
    pub async fn expect_handshake(&mut self) -> anyhow::Result<()> {
        let lines = [self.recv().await?, self.recv().await?, self.recv().await?];
        anyhow::ensure!(
            lines == ["PASS secret", "NICK tester", "USER tester 0 * :tester"],
            "unexpected handshake: {lines:?}"
        );
        Ok(())
    }

    /// Send the registration confirmation.
    pub async fn welcome(&mut self) -> anyhow::Result<()> {
        self.send_raw(":cho.ppy.sh 001 tester :Welcome to the osu!Bancho.")
            .await
    }

    /// Close the connection from the server side.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
