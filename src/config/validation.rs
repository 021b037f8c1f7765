//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bancho.username is required")]
    MissingUsername,
    #[error("bancho.password is required")]
    MissingPassword,
    #[error("bancho.host is required")]
    MissingHost,
    #[error("bancho.port must be non-zero")]
    InvalidPort,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let bancho = &config.bancho;

    if bancho.username.trim().is_empty() {
        errors.push(ValidationError::MissingUsername);
    }
    if bancho.password.trim().is_empty() {
        errors.push(ValidationError::MissingPassword);
    }
    if bancho.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if bancho.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
