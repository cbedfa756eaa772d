//! Outbound delivery of webhook payloads.

use serenity::async_trait;

use crate::common::DeliveryError;
use crate::mirror::WebhookPayload;

/// Sends payloads to webhook endpoints.
///
/// The Discord implementation lives in `discord::webhook`; tests use an
/// in-memory one.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(&self, endpoint: &str, payload: &WebhookPayload) -> Result<(), DeliveryError>;
}

/// Strip the secret token from a webhook URL for logging.
///
/// `https://discord.com/api/webhooks/<id>/<token>` becomes
/// `https://discord.com/api/webhooks/<id>`.
pub fn redact_endpoint(endpoint: &str) -> &str {
    match endpoint.trim_end_matches('/').rsplit_once('/') {
        Some((prefix, _)) if prefix.contains("/webhooks/") => prefix,
        _ => endpoint,
    }
}
