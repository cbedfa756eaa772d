//! Discord bot client.
//!
//! Gateway events are forwarded over a channel and handled in one loop,
//! keeping serenity's callbacks free of mirror logic.

use std::sync::Arc;
use std::time::Duration;

use backon::BackoffBuilder;
use serenity::async_trait;
use serenity::cache::Settings as CacheSettings;
use serenity::http::HttpBuilder;
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use serenity::Client;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::bridge::{Dispatcher, MirrorLog};
use crate::config::types::Config;
use crate::config::validate::parse_status;
use crate::mirror::MirrorRegistry;

use super::handler::MirrorHandler;
use super::webhook::DiscordWebhooks;

const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(300);

/// Messages kept per channel. Edits of messages outside the cache arrive
/// without the full message and are not mirrored.
const CACHED_MESSAGES_PER_CHANNEL: usize = 200;

#[derive(Debug, Clone)]
pub enum DiscordBotEvent {
    /// Bot connected and ready.
    Ready { context: Context, ready: Ready },
    /// Message created.
    Message { context: Context, message: Message },
    /// Message edited. Only carries the full message when it was cached.
    MessageUpdate { context: Context, message: Message },
}

struct DiscordBotEvents {
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
}

impl DiscordBotEvents {
    fn new(discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>) -> Self {
        Self { discord_events_tx }
    }

    fn forward(&self, event: DiscordBotEvent) {
        if let Err(error) = self.discord_events_tx.send(event) {
            warn!("Failed to process discord event: {}", error);
        }
    }
}

#[async_trait]
impl EventHandler for DiscordBotEvents {
    async fn ready(&self, context: Context, ready: Ready) {
        self.forward(DiscordBotEvent::Ready { context, ready });
    }

    async fn message(&self, context: Context, message: Message) {
        self.forward(DiscordBotEvent::Message { context, message });
    }

    async fn message_update(
        &self,
        context: Context,
        _old_if_available: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        match new {
            Some(message) => self.forward(DiscordBotEvent::MessageUpdate { context, message }),
            None => debug!(message_id = event.id.get(), "Ignoring update of uncached message"),
        }
    }
}

/// Builder for creating the Discord bot.
pub struct MirrorBotBuilder {
    config: Config,
    registry: MirrorRegistry,
    shutdown_rx: watch::Receiver<bool>,
}

impl MirrorBotBuilder {
    pub fn new(config: Config, registry: MirrorRegistry, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            config,
            registry,
            shutdown_rx,
        }
    }

    /// Build the Discord client and the mirror pipeline around it.
    pub async fn build(self) -> anyhow::Result<MirrorBot> {
        let token = self.config.discord.token.clone();
        let (discord_events_tx, discord_events_rx) = mpsc::unbounded_channel::<DiscordBotEvent>();

        let client = build_client(&token, discord_events_tx.clone()).await?;

        let webhooks = DiscordWebhooks::new(
            Arc::clone(&client.http),
            self.registry.webhook_urls(),
        );
        let dispatcher = Dispatcher::new(self.registry, Arc::new(webhooks));

        let log = match self.config.log_message {
            Some(template) => MirrorLog::new(template),
            None => MirrorLog::disabled(),
        };
        let status = self.config.discord.status.as_deref().and_then(parse_status);

        Ok(MirrorBot {
            client: Some(client),
            token,
            handler: MirrorHandler::new(dispatcher, log, status),
            discord_events_rx,
            discord_events_tx,
            shutdown_rx: self.shutdown_rx,
        })
    }
}

async fn build_client(
    token: &str,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
) -> anyhow::Result<Client> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILDS;

    let reqwest_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let http = HttpBuilder::new(token).client(reqwest_client).build();

    let events = DiscordBotEvents::new(discord_events_tx);
    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .cache_settings(cache_settings())
        .event_handler(events)
        .await?;
    Ok(client)
}

fn cache_settings() -> CacheSettings {
    let mut settings = CacheSettings::default();
    settings.max_messages = CACHED_MESSAGES_PER_CHANNEL;
    settings
}

pub struct MirrorBot {
    client: Option<Client>,
    token: String,
    handler: MirrorHandler,
    discord_events_rx: mpsc::UnboundedReceiver<DiscordBotEvent>,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
    shutdown_rx: watch::Receiver<bool>,
}

impl MirrorBot {
    pub async fn run(mut self) {
        let shard_manager = self.client.as_ref().map(|c| c.shard_manager.clone());
        let mut shutdown_rx = self.shutdown_rx.clone();

        tokio::select! {
            _ = Self::run_connection(&mut self.client, &self.token, &self.discord_events_tx) => {},
            _ = Self::process_events(&mut self.discord_events_rx, &self.handler) => {},
            _ = async {
                loop {
                    if shutdown_rx.changed().await.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                if let Some(ref manager) = shard_manager {
                    info!("Initiating graceful Discord shutdown...");
                    manager.shutdown_all().await;
                    info!("Discord shutdown complete");
                }
            } => {}
        }
        info!("Discord task ended");
    }

    async fn run_connection(
        client: &mut Option<Client>,
        token: &str,
        discord_events_tx: &mpsc::UnboundedSender<DiscordBotEvent>,
    ) {
        /// 5s initial, 5min max, factor 1.1, with jitter, unlimited retries.
        fn discord_backoff() -> impl Iterator<Item = Duration> {
            backon::ExponentialBuilder::default()
                .with_min_delay(Duration::from_secs(5))
                .with_max_delay(MAX_RECONNECT_DELAY)
                .with_factor(1.1)
                .with_jitter()
                .without_max_times()
                .build()
        }

        let mut backoff = discord_backoff();

        loop {
            info!("Connecting to Discord...");

            let mut client = match client.take() {
                Some(client) => client,
                None => match build_client(token, discord_events_tx.clone()).await {
                    Ok(client) => {
                        backoff = discord_backoff();
                        client
                    }
                    Err(e) => {
                        error!("Failed to rebuild Discord client: {}", e);
                        let delay = backoff.next().unwrap_or(MAX_RECONNECT_DELAY);
                        warn!("Retrying in {:.1}s...", delay.as_secs_f64());
                        sleep(delay).await;
                        continue;
                    }
                },
            };

            match client.start().await {
                Ok(()) => {
                    info!("Discord client disconnected normally");
                    break;
                }
                Err(e) => {
                    error!("Discord client error: {}", e);
                    let delay = backoff.next().unwrap_or(MAX_RECONNECT_DELAY);
                    warn!(
                        "Discord disconnected. Reconnecting in {:.1}s...",
                        delay.as_secs_f64(),
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn process_events(
        discord_events_rx: &mut mpsc::UnboundedReceiver<DiscordBotEvent>,
        handler: &MirrorHandler,
    ) {
        while let Some(event) = discord_events_rx.recv().await {
            match event {
                DiscordBotEvent::Ready { context, ready } => {
                    handler.handle_ready(&context, &ready);
                }
                DiscordBotEvent::Message { context, message } => {
                    handler.handle_message(&context, &message, false);
                }
                DiscordBotEvent::MessageUpdate { context, message } => {
                    handler.handle_message(&context, &message, true);
                }
            }
        }
        debug!("Discord events channel closed.");
    }
}
