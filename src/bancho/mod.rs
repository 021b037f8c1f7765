//! Domain adapter for the osu! Bancho gateway.
//!
//! [`BanchoClient`] wraps the connection engine and turns raw lines into
//! private messages and channels. Channels are created the first time the
//! server mentions them (an incoming `PRIVMSG` or a 332 topic reply after a
//! join) and live as long as the client.

mod channel;
mod client;
mod events;
mod message;

pub use channel::Channel;
pub use client::{BanchoClient, BanchoConfig};
pub use events::BanchoEventHandler;
pub use message::{InvalidPrivateMessage, PrivateMessage};

/// Well-known Bancho IRC host.
pub const DEFAULT_HOST: &str = "irc.ppy.sh";

/// Well-known Bancho IRC port.
pub const DEFAULT_PORT: u16 = 6667;

/// Nickname of the server's own bot account.
pub const BANCHO_BOT: &str = "BanchoBot";

/// Name prefix of multiplayer and tournament lobby channels.
pub const MULTIPLAYER_PREFIX: &str = "#mp_";
