//! Integration test common infrastructure.
//!
//! Provides an in-process mock Bancho server and an event recorder.

pub mod recorder;
pub mod server;

#[allow(unused_imports)]
pub use recorder::{Event, Events, Recorder};
#[allow(unused_imports)]
pub use server::{MockServer, ServerConnection};

use bancho_irc::BanchoConfig;

/// Client settings pointing at a mock server.
#[allow(dead_code)]
pub fn config(port: u16) -> BanchoConfig {
    let mut config = BanchoConfig::new("tester", "secret");
    config.host = "127.0.0.1".to_string();
    config.port = port;
    config
}
