//! Handling of gateway events forwarded by the client.

use std::sync::Arc;

use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::user::OnlineStatus;
use serenity::prelude::Context;
use tracing::{debug, info};

use crate::bridge::{DispatchOutcome, Dispatcher, MessageOrigin, MirrorLog};
use crate::common::MirrorMessage;
use crate::mirror::DeliveryCallback;

pub struct MirrorHandler {
    dispatcher: Dispatcher,
    log: Arc<MirrorLog>,
    status: Option<OnlineStatus>,
}

impl MirrorHandler {
    pub fn new(dispatcher: Dispatcher, log: MirrorLog, status: Option<OnlineStatus>) -> Self {
        Self {
            dispatcher,
            log: Arc::new(log),
            status,
        }
    }

    pub fn handle_ready(&self, context: &Context, ready: &Ready) {
        info!(
            "Discord bot connected as {} ({} guilds)",
            ready.user.name,
            ready.guilds.len()
        );
        info!(
            "Watching {} channels across {} mirrors",
            self.dispatcher.registry().channel_count(),
            self.dispatcher.registry().rules().len()
        );

        if let Some(status) = self.status {
            context.set_presence(None, status);
        }
    }

    /// Mirror a created or edited message.
    pub fn handle_message(&self, context: &Context, message: &Message, is_update: bool) {
        let on_delivered = self.delivery_log(context, message);
        let outcome =
            self.dispatcher
                .process_message(MirrorMessage::from(message), is_update, on_delivered);

        if let DispatchOutcome::Dispatched(tasks) = outcome {
            debug!(
                message_id = message.id.get(),
                is_update,
                "Mirroring to {} webhooks",
                tasks.len()
            );
        }
    }

    /// Callback logging one line per successful delivery.
    fn delivery_log(&self, context: &Context, message: &Message) -> DeliveryCallback {
        let log = Arc::clone(&self.log);
        if !log.is_enabled() {
            return Arc::new(|_: &MirrorMessage| {});
        }

        let origin = message_origin(context, message);
        Arc::new(move |_: &MirrorMessage| {
            if let Some(line) = log.render(&origin) {
                info!("{}", line);
            }
        })
    }
}

/// Names for the log line, falling back to ids when the cache has nothing.
fn message_origin(context: &Context, message: &Message) -> MessageOrigin {
    let author = message.author.name.clone();
    let fallback_channel = message.channel_id.to_string();

    let Some(guild_id) = message.guild_id else {
        return MessageOrigin {
            author,
            server: String::new(),
            channel: fallback_channel,
        };
    };

    match context.cache.guild(guild_id) {
        Some(guild) => MessageOrigin {
            author,
            server: guild.name.clone(),
            channel: guild
                .channels
                .get(&message.channel_id)
                .map(|channel| channel.name.clone())
                .unwrap_or(fallback_channel),
        },
        None => MessageOrigin {
            author,
            server: guild_id.to_string(),
            channel: fallback_channel,
        },
    }
}
