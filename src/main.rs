use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bancho_irc::bancho::{BanchoClient, BanchoConfig, BanchoEventHandler, Channel, PrivateMessage};
use bancho_irc::commands::{CommandDescriptor, CommandDispatcher, handler_fn};
use bancho_irc::config::{Config, validate};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Logs session events.
struct EventLog;

#[async_trait]
impl BanchoEventHandler for EventLog {
    async fn on_authenticated(&self, client: &BanchoClient) {
        info!(username = %client.username(), "Logged in");
    }

    async fn on_private_message(&self, _client: &BanchoClient, message: &PrivateMessage) {
        info!(
            from = %message.sender(),
            to = %message.recipient(),
            bot = message.is_from_system_bot(),
            "{}",
            message.content()
        );
    }

    async fn on_channel_joined(&self, _client: &BanchoClient, channel: &Arc<Channel>) {
        info!(channel = %channel.name(), "Channel opened");
    }
}

fn commands(cancel: &CancellationToken) -> anyhow::Result<CommandDispatcher> {
    let mut dispatcher = CommandDispatcher::new().with_cancellation(cancel.clone());
    let reply_cancel = cancel.clone();
    dispatcher.register(
        CommandDescriptor::builder("ping")
            .message()
            .handler(handler_fn(move |client, args| {
                let cancel = reply_cancel.clone();
                async move {
                    if let Some(message) = args.message(0) {
                        client
                            .send_private_message(message.reply_target(), "pong", &cancel)
                            .await?;
                    }
                    Ok(())
                }
            }))
            .build()?,
    );
    Ok(dispatcher)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let mut config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {config_path}"))?;
    config.apply_env_overrides();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    let cancel = CancellationToken::new();
    let client = BanchoClient::new(BanchoConfig::from(&config.bancho));
    client.subscribe(Arc::new(EventLog));
    client.subscribe(Arc::new(commands(&cancel)?));

    info!(
        host = %config.bancho.host,
        port = config.bancho.port,
        username = %config.bancho.username,
        "Starting bancho-irc"
    );

    let signal_client = client.clone();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        info!("Shutdown requested");
        if let Err(e) = signal_client.disconnect(&signal_cancel).await {
            warn!(error = %e, "Disconnect failed");
            signal_cancel.cancel();
        }
    });

    let result = client.connect(&cancel).await;
    cancel.cancel();
    result.context("connection ended")?;
    info!("Stopped");
    Ok(())
}
