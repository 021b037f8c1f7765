//! Configuration loading and management.
//!
//! - [`types`]: config structs and TOML loading
//! - [`validation`]: startup checks that report every problem at once
//! - [`defaults`]: serde default functions

mod defaults;
mod types;
mod validation;

pub use types::{BanchoSection, Config, ConfigError, LoggingConfig, PASSWORD_ENV, USERNAME_ENV};
pub use validation::{ValidationError, validate};
