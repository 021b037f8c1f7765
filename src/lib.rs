//! bancho-irc - client for the osu! Bancho IRC gateway.
//!
//! Layers, bottom up:
//!
//! - [`bancho_proto`]: line parser, command serializer, tokio codecs
//! - [`irc`]: TCP connection, handshake, keep-alive, raw events
//! - [`bancho`]: private messages and the channel registry
//! - [`commands`]: typed `!command` registration and dispatch
//!
//! ```no_run
//! use std::sync::Arc;
//! use bancho_irc::bancho::{BanchoClient, BanchoConfig};
//! use bancho_irc::commands::{CommandDescriptor, CommandDispatcher, ParamType, handler_fn};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = BanchoClient::new(BanchoConfig::new("my_name", "irc-password"));
//!
//! let mut dispatcher = CommandDispatcher::new();
//! dispatcher.register(
//!     CommandDescriptor::builder("roll")
//!         .optional("max", ParamType::Int)
//!         .message()
//!         .handler(handler_fn(|client, args| async move {
//!             let max = args.int(0).unwrap_or(100);
//!             if let Some(target) = args.message(1).map(|m| m.reply_target().to_owned()) {
//!                 let text = format!("rolled out of {max}");
//!                 client.send_private_message(&target, &text, &CancellationToken::new()).await?;
//!             }
//!             Ok(())
//!         }))
//!         .build()?,
//! );
//! client.subscribe(Arc::new(dispatcher));
//!
//! client.connect(&CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod bancho;
pub mod commands;
pub mod config;
pub mod error;
pub mod irc;
pub mod observer;
pub mod telemetry;

pub use bancho::{BanchoClient, BanchoConfig, BanchoEventHandler, Channel, PrivateMessage};
pub use bancho_proto;
pub use commands::{CommandDescriptor, CommandDispatcher};
pub use error::{ClientError, ClientResult};
pub use irc::{ConnectionState, IrcClient, IrcConfig, IrcEventHandler};
