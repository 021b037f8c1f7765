use std::future::Future;

use async_trait::async_trait;

use super::Arguments;
use crate::bancho::BanchoClient;

/// Code run when a chat command matches.
///
/// Returned errors are logged by the dispatcher; nothing is sent to the user
/// unless the handler does it.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, client: &BanchoClient, args: Arguments) -> anyhow::Result<()>;
}

/// Adapter created by [`handler_fn`].
pub struct HandlerFn<F>(F);

/// Use an async closure as a [`CommandHandler`].
///
/// ```no_run
/// use bancho_irc::commands::{CommandDescriptor, ParamType, handler_fn};
/// use tokio_util::sync::CancellationToken;
///
/// let echo = CommandDescriptor::builder("echo")
///     .param("text", ParamType::Text)
///     .message()
///     .handler(handler_fn(|client, args| async move {
///         let text = args.text(0).unwrap_or_default().to_string();
///         let target = args.message(1).map(|m| m.reply_target().to_string());
///         if let Some(target) = target {
///             client
///                 .send_private_message(&target, &text, &CancellationToken::new())
///                 .await?;
///         }
///         Ok(())
///     }))
///     .build()
///     .unwrap();
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(BanchoClient, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> CommandHandler for HandlerFn<F>
where
    F: Fn(BanchoClient, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn handle(&self, client: &BanchoClient, args: Arguments) -> anyhow::Result<()> {
        (self.0)(client.clone(), args).await
    }
}
