//! Dispatch pipeline from monitored channels to webhooks.
//!
//! Every created or edited message goes through [`Dispatcher::process_message`]:
//! platform-level checks, rule lookup, qualification, replacements, then a
//! fan-out to the rule's webhooks.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::common::MirrorMessage;
use crate::mirror::{DeliveryCallback, MirrorRegistry, Qualification, Rejection};

use super::delivery::WebhookSender;

/// Why a message was not mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    System,
    DirectMessage,
    Ephemeral,
    Empty,
    Crossposted,
    /// The channel has no mirror.
    Unmirrored,
    Rejected(Rejection),
}

/// Result of processing one message.
#[derive(Debug)]
pub enum DispatchOutcome {
    Skipped(SkipReason),
    /// Send tasks, one per webhook. Nothing needs to await them.
    Dispatched(Vec<JoinHandle<()>>),
}

/// Owns the mirror registry and the webhook sender for the lifetime of the
/// process.
pub struct Dispatcher {
    registry: MirrorRegistry,
    sender: Arc<dyn WebhookSender>,
}

impl Dispatcher {
    pub fn new(registry: MirrorRegistry, sender: Arc<dyn WebhookSender>) -> Self {
        Self { registry, sender }
    }

    pub fn registry(&self) -> &MirrorRegistry {
        &self.registry
    }

    /// Mirror a created (`is_update == false`) or edited message.
    ///
    /// A replacement failure is logged and the message is still sent with
    /// the replacements applied so far. Sends run in spawned tasks, so this
    /// must be called inside a tokio runtime.
    pub fn process_message(
        &self,
        message: MirrorMessage,
        is_update: bool,
        on_delivered: DeliveryCallback,
    ) -> DispatchOutcome {
        if let Some(reason) = unmirrorable_reason(&message) {
            debug!(message_id = message.id, ?reason, "Skipping message");
            return DispatchOutcome::Skipped(reason);
        }

        let Some(rule) = self.registry.get(message.channel_id) else {
            debug!(channel_id = message.channel_id, "Channel is not mirrored");
            return DispatchOutcome::Skipped(SkipReason::Unmirrored);
        };

        let mut message = match rule.qualify(message, is_update) {
            Qualification::Accepted(message) => message,
            Qualification::Rejected(rejection) => {
                debug!(?rejection, is_update, "Message rejected by mirror");
                return DispatchOutcome::Skipped(SkipReason::Rejected(rejection));
            }
        };

        if let Err(e) = rule.apply_replacements(&mut message) {
            warn!(
                message_id = message.id,
                "Replacement failed, mirroring partially replaced message: {}", e
            );
        }

        DispatchOutcome::Dispatched(rule.dispatch_message(
            message,
            Arc::clone(&self.sender),
            on_delivered,
        ))
    }
}

/// Checks that apply to every message, whatever the mirror.
fn unmirrorable_reason(message: &MirrorMessage) -> Option<SkipReason> {
    if message.system {
        Some(SkipReason::System)
    } else if message.guild_id.is_none() {
        Some(SkipReason::DirectMessage)
    } else if message.ephemeral {
        Some(SkipReason::Ephemeral)
    } else if message.is_empty() {
        Some(SkipReason::Empty)
    } else if message.crossposted {
        Some(SkipReason::Crossposted)
    } else {
        None
    }
}
