//! Connection engine.
//!
//! Owns the TCP stream, performs the `PASS`/`NICK`/`USER` handshake, answers
//! keep-alive `PING`s and publishes every received line to subscribers.
//!
//! ## Lifecycle
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> Authenticated -> Disconnected
//! ```
//!
//! [`IrcClient::connect`] drives the whole session: it returns once the read
//! loop stops (disconnect, cancellation, or error). Other tasks send through a
//! shared reference while it runs; writes are serialized by an async mutex so
//! concurrent senders never interleave lines.

mod client;
mod events;
mod state;

pub use client::{IrcClient, IrcConfig};
pub use events::IrcEventHandler;
pub use state::ConnectionState;
