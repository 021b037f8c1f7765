use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, warn};

use super::argument::coerce;
use super::{ArgValue, Arguments, CommandDescriptor, CommandError, CommandHandler};
use crate::bancho::{BanchoClient, BanchoEventHandler, MULTIPLAYER_PREFIX, PrivateMessage};
use crate::telemetry::{CommandTimer, spans};

/// Prefix marking a chat line as a command.
pub const COMMAND_PREFIX: char = '!';

/// Routes `!command` chat messages to registered handlers.
///
/// Register everything first, then subscribe the dispatcher to a
/// [`BanchoClient`]; the table is read-only once shared.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use bancho_irc::bancho::{BanchoClient, BanchoConfig};
/// # use bancho_irc::commands::{CommandDescriptor, CommandDispatcher, handler_fn};
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BanchoClient::new(BanchoConfig::new("me", "irc-password"));
/// let mut dispatcher = CommandDispatcher::new();
/// dispatcher.register(
///     CommandDescriptor::builder("ping")
///         .handler(handler_fn(|_client, _args| async { Ok(()) }))
///         .build()?,
/// );
/// client.subscribe(Arc::new(dispatcher));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    commands: HashMap<String, CommandDescriptor>,
    cancel: CancellationToken,
}

/// A validated command ready to run.
pub struct Invocation {
    name: String,
    arguments: Arguments,
    handler: Arc<dyn CommandHandler>,
}

impl Invocation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub async fn run(self, client: &BanchoClient) -> anyhow::Result<()> {
        self.handler.handle(client, self.arguments).await
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel replies sent by the dispatcher when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Add a command, replacing any earlier one with the same name.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        let name = descriptor.name().to_string();
        if self.commands.insert(name.clone(), descriptor).is_some() {
            debug!(command = %name, "Replaced existing command");
        } else {
            debug!(command = %name, "Registered command");
        }
    }

    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Match and bind a chat message without running anything.
    ///
    /// `Ok(None)` means the message is not for us: not a command, an unknown
    /// name, or a context the command does not allow. `Err` carries the text
    /// to reply with.
    pub fn prepare(&self, message: &PrivateMessage) -> Result<Option<Invocation>, CommandError> {
        let mut tokens = message.content().split_whitespace();
        let Some(head) = tokens.next() else {
            return Ok(None);
        };
        if !message.content().starts_with(COMMAND_PREFIX) {
            return Ok(None);
        }
        let Some(command) = self.commands.get(head.trim_start_matches(COMMAND_PREFIX)) else {
            return Ok(None);
        };

        if !command.allow_private() && !message.is_channel_message() {
            return Ok(None);
        }
        if !command.allow_multiplayer() && message.reply_target().starts_with(MULTIPLAYER_PREFIX) {
            return Ok(None);
        }

        let tokens: Vec<&str> = tokens.collect();
        if tokens.len() < command.required_count() {
            return Err(CommandError::TooFewArguments {
                expected: command.required_count(),
                got: tokens.len(),
            });
        }
        if tokens.len() > command.total_count() {
            return Err(CommandError::TooManyArguments {
                expected: command.total_count(),
                got: tokens.len(),
            });
        }

        let mut values = Vec::with_capacity(command.params().len());
        for (param, token) in command
            .user_params()
            .zip(tokens.iter().map(Some).chain(std::iter::repeat(None)))
        {
            let value = match token {
                None => ArgValue::Absent,
                Some(token) => coerce(&param.ty, token).ok_or_else(|| {
                    CommandError::InvalidArgument {
                        token: token.to_string(),
                        parameter: param.name.clone(),
                    }
                })?,
            };
            values.push(value);
        }
        if let Some(index) = command.message_index() {
            values.insert(index, ArgValue::Message(message.clone()));
        }

        Ok(Some(Invocation {
            name: command.name().to_string(),
            arguments: Arguments::new(values),
            handler: Arc::clone(command.handler()),
        }))
    }

    /// Validate, reply on bad input, and run the handler to completion.
    pub async fn dispatch(&self, client: &BanchoClient, message: &PrivateMessage) {
        let invocation = match self.prepare(message) {
            Ok(Some(invocation)) => invocation,
            Ok(None) => return,
            Err(e) => {
                debug!(sender = %message.sender(), error = %e, "Rejected command input");
                let reply = e.to_string();
                if let Err(send_err) = client
                    .send_private_message(message.reply_target(), &reply, &self.cancel)
                    .await
                {
                    warn!(error = %send_err, "Failed to send command error reply");
                }
                return;
            }
        };

        let span = spans::command(invocation.name(), message.sender(), message.reply_target());
        async {
            let _timer = CommandTimer::new(invocation.name());
            let name = invocation.name().to_string();
            if let Err(e) = invocation.run(client).await {
                warn!(command = %name, error = %e, "Command handler failed");
            }
        }
        .instrument(span)
        .await;
    }
}

#[async_trait]
impl BanchoEventHandler for CommandDispatcher {
    async fn on_private_message(&self, client: &BanchoClient, message: &PrivateMessage) {
        self.dispatch(client, message).await;
    }
}
