//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_host, default_log_level, default_port, default_true};
use crate::bancho::BanchoConfig;

/// Environment variable overriding `bancho.username`.
pub const USERNAME_ENV: &str = "OSU_IRC_USERNAME";
/// Environment variable overriding `bancho.password`.
pub const PASSWORD_ENV: &str = "OSU_IRC_PASSWORD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bancho account and server.
    pub bancho: BanchoSection,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Replace credentials with `OSU_IRC_USERNAME` / `OSU_IRC_PASSWORD` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(USERNAME_ENV).ok(),
            std::env::var(PASSWORD_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, username: Option<String>, password: Option<String>) {
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            self.bancho.username = username;
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.bancho.password = password;
        }
    }
}

/// `[bancho]` section.
#[derive(Clone, Deserialize)]
pub struct BanchoSection {
    /// osu! username; used as both IRC nickname and username.
    #[serde(default)]
    pub username: String,
    /// IRC password from the osu! account settings page.
    #[serde(default)]
    pub password: String,
    /// Server host (default: `irc.ppy.sh`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Keep an in-memory message log per channel.
    #[serde(default = "default_true")]
    pub save_messages: bool,
}

impl std::fmt::Debug for BanchoSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BanchoSection")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("save_messages", &self.save_messages)
            .finish()
    }
}

impl From<&BanchoSection> for BanchoConfig {
    fn from(section: &BanchoSection) -> Self {
        BanchoConfig {
            username: section.username.clone(),
            password: section.password.clone(),
            host: section.host.clone(),
            port: section.port,
            save_messages: section.save_messages,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (e.g. `"info"`, `"bancho_irc=debug"`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
