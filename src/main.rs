//! Webhook Mirror - relays Discord messages to webhooks
//!
//! Watches configured channels and re-posts every qualifying message to
//! one or more webhooks, with optional filtering and text replacements.

mod bridge;
mod common;
mod config;
mod discord;
mod mirror;

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use config::{env::get_config_path, load_and_validate};
use discord::MirrorBotBuilder;
use mirror::MirrorRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Webhook Mirror v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        e
    })?;

    let registry = MirrorRegistry::from_config(&config.mirrors).map_err(|e| {
        error!("Failed to build mirrors: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Mirrors: {}", registry.rules().len());
    info!("  Channels: {}", registry.channel_count());
    info!("  Webhooks: {}", registry.webhook_urls().len());
    info!(
        "  Replacements: {}",
        registry.rules().iter().map(|rule| rule.replacement_count()).sum::<usize>()
    );
    if let Some(ref status) = config.discord.status {
        info!("  Status: {}", status);
    }
    if registry.is_empty() {
        warn!("No channels are mirrored");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let bot = MirrorBotBuilder::new(config, registry, shutdown_rx)
        .build()
        .await?;

    info!("Starting Discord bot...");
    let mut discord_task = tokio::spawn(bot.run());

    let shutdown = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - disconnecting...");
            true
        }
        _ = &mut discord_task => false,
    };

    if shutdown {
        if let Err(e) = shutdown_tx.send(true) {
            debug!("Shutdown channel closed (Discord task already exited): {}", e);
        }
        let timeout = tokio::time::Duration::from_secs(5);
        match tokio::time::timeout(timeout, discord_task).await {
            Ok(Ok(())) => info!("Discord client stopped gracefully"),
            Ok(Err(e)) => warn!("Discord task panicked: {}", e),
            Err(_) => warn!("Discord shutdown timed out"),
        }
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
