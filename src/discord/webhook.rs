//! Webhook delivery through the Discord HTTP API.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serenity::async_trait;
use serenity::builder::{CreateAttachment, ExecuteWebhook};
use serenity::http::Http;
use serenity::model::webhook::Webhook;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::bridge::delivery::{redact_endpoint, WebhookSender};
use crate::common::{Attachment, DeliveryError};
use crate::mirror::WebhookPayload;

use super::convert::create_embed;

/// Sends payloads to the configured webhooks.
///
/// Each webhook is resolved from its URL on first use and cached for the
/// lifetime of the process.
pub struct DiscordWebhooks {
    http: Arc<Http>,
    webhooks: HashMap<String, OnceCell<Webhook>>,
}

impl DiscordWebhooks {
    pub fn new<'a>(http: Arc<Http>, endpoints: impl IntoIterator<Item = &'a str>) -> Self {
        let webhooks = endpoints
            .into_iter()
            .map(|endpoint| (endpoint.to_string(), OnceCell::new()))
            .collect();
        Self { http, webhooks }
    }

    async fn webhook(&self, endpoint: &str) -> Result<&Webhook, DeliveryError> {
        let cell = self
            .webhooks
            .get(endpoint)
            .ok_or_else(|| DeliveryError::UnknownEndpoint {
                endpoint: redact_endpoint(endpoint).to_string(),
            })?;

        cell.get_or_try_init(|| async {
            debug!("Resolving webhook {}", redact_endpoint(endpoint));
            Webhook::from_url(&self.http, endpoint)
                .await
                .map_err(|source| DeliveryError::ResolveFailed {
                    endpoint: redact_endpoint(endpoint).to_string(),
                    source,
                })
        })
        .await
    }

    async fn download(&self, attachment: &Attachment) -> Result<CreateAttachment, DeliveryError> {
        CreateAttachment::url(&self.http, &attachment.url)
            .await
            .map_err(|source| DeliveryError::AttachmentFailed {
                url: attachment.url.clone(),
                source,
            })
    }
}

#[async_trait]
impl WebhookSender for DiscordWebhooks {
    async fn send(&self, endpoint: &str, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        let webhook = self.webhook(endpoint).await?;
        let files = try_join_all(payload.attachments.iter().map(|a| self.download(a))).await?;

        let mut builder = ExecuteWebhook::new()
            .embeds(payload.embeds.iter().map(create_embed).collect())
            .add_files(files);
        if let Some(ref content) = payload.content {
            builder = builder.content(content.as_str());
        }
        if let Some(ref username) = payload.username {
            builder = builder.username(username.as_str());
        }
        if let Some(ref avatar_url) = payload.avatar_url {
            builder = builder.avatar_url(avatar_url.as_str());
        }

        let http: &Http = &self.http;
        webhook
            .execute(http, false, builder)
            .await
            .map_err(|source| DeliveryError::SendFailed {
                endpoint: redact_endpoint(endpoint).to_string(),
                source,
            })?;
        Ok(())
    }
}
