//! Telemetry utilities for command timing and span construction.

use std::time::Instant;

use tracing::debug;

/// Guard for timing a chat command invocation.
///
/// Logs the elapsed time when dropped, including early exits.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        debug!(command = %self.command, elapsed_ms, "Command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span covering one connection's lifetime.
    pub fn connection(host: &str, port: u16, nick: &str) -> Span {
        info_span!("connection", host = %host, port = port, nick = %nick)
    }

    /// Span covering one chat command dispatch.
    pub fn command(name: &str, sender: &str, target: &str) -> Span {
        debug_span!("command", name = %name, sender = %sender, target = %target)
    }
}
