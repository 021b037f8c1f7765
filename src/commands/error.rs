//! Command errors.
//!
//! [`CommandError`] is never returned to library callers: the dispatcher
//! answers it in chat, and its `Display` text is the reply.

use thiserror::Error;

/// User input that does not fit a command's parameter list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Expected at least {expected} parameters, got {got}")]
    TooFewArguments { expected: usize, got: usize },

    #[error("Expected no more than {expected} parameters, got {got}")]
    TooManyArguments { expected: usize, got: usize },

    #[error("Invalid {token} specified for {parameter}")]
    InvalidArgument { token: String, parameter: String },
}

/// A command definition that cannot be registered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("command name {0:?} must be non-empty and contain no whitespace")]
    InvalidName(String),

    #[error("command {command}: parameter {parameter} has unsupported type {ty}")]
    UnsupportedParameterType {
        command: String,
        parameter: String,
        ty: String,
    },

    #[error("command {0} declares more than one message parameter")]
    DuplicateMessageParameter(String),

    #[error("command {command}: required parameter {parameter} follows an optional one")]
    RequiredAfterOptional { command: String, parameter: String },

    #[error("command {0} has no handler")]
    MissingHandler(String),
}
