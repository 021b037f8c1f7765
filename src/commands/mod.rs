//! Chat command dispatch.
//!
//! Commands are `!name arg1 arg2 ...` messages. Each registered
//! [`CommandDescriptor`] declares typed parameters; the
//! [`CommandDispatcher`] splits the text on whitespace, checks the count,
//! converts each token, and calls the handler. Bad input gets a chat reply
//! explaining what was expected. Unknown commands and commands used where
//! they are not allowed are ignored without a reply.
//!
//! ```text
//! !test hello Test          -> handler("hello", Test, <absent>, <message>)
//! !test hello               -> "Expected at least 2 parameters, got 1"
//! !test hello Bogus         -> "Invalid Bogus specified for mode"
//! ```

mod argument;
mod descriptor;
mod dispatcher;
mod error;
mod handler;

pub use argument::{ArgValue, ArgumentEnum, Arguments, EnumValue};
pub use descriptor::{CommandBuilder, CommandDescriptor, EnumSpec, ParamType, ParameterSpec};
pub use dispatcher::{COMMAND_PREFIX, CommandDispatcher, Invocation};
pub use error::{CommandError, RegistrationError};
pub use handler::{CommandHandler, HandlerFn, handler_fn};
pub use rust_decimal::Decimal;
