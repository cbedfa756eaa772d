//! Mirror rules: which messages of a channel get relayed, and where.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::bridge::delivery::{redact_endpoint, WebhookSender};
use crate::common::{ConfigError, MirrorMessage, ReplacementError};
use crate::config::types::{MirrorConfig, OptionsConfig, RequirementsConfig};

use super::payload::build_payloads;
use super::replacement::ReplacementSet;

/// Invoked once per payload successfully delivered to an endpoint.
pub type DeliveryCallback = Arc<dyn Fn(&MirrorMessage) + Send + Sync>;

/// Minimum sizes a message must reach to be mirrored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorRequirements {
    pub min_embeds_count: usize,
    pub min_content_length: usize,
    pub min_attachments_count: usize,
}

impl From<&RequirementsConfig> for MirrorRequirements {
    fn from(config: &RequirementsConfig) -> Self {
        Self {
            min_embeds_count: config.min_embeds_count.unwrap_or(0),
            min_content_length: config.min_content_length.unwrap_or(0),
            min_attachments_count: config.min_attachments_count.unwrap_or(0),
        }
    }
}

/// Behavior switches of a mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Keep the webhook's own name and avatar instead of the author's.
    pub use_webhook_profile: bool,
    pub remove_attachments: bool,
    pub mirror_messages_from_bots: bool,
    pub mirror_reply_messages: bool,
    pub mirror_messages_on_edit: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            use_webhook_profile: false,
            remove_attachments: false,
            mirror_messages_from_bots: true,
            mirror_reply_messages: true,
            mirror_messages_on_edit: false,
        }
    }
}

impl From<&OptionsConfig> for MirrorOptions {
    fn from(config: &OptionsConfig) -> Self {
        let defaults = Self::default();
        Self {
            use_webhook_profile: config
                .use_webhook_profile
                .unwrap_or(defaults.use_webhook_profile),
            remove_attachments: config
                .remove_attachments
                .unwrap_or(defaults.remove_attachments),
            mirror_messages_from_bots: config
                .mirror_messages_from_bots
                .unwrap_or(defaults.mirror_messages_from_bots),
            mirror_reply_messages: config
                .mirror_reply_messages
                .unwrap_or(defaults.mirror_reply_messages),
            mirror_messages_on_edit: config
                .mirror_messages_on_edit
                .unwrap_or(defaults.mirror_messages_on_edit),
        }
    }
}

/// Why a rule declined a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Bot author, reply, or edit not allowed by the options.
    Options,
    /// Below a threshold, or the author or one of their roles is ignored.
    Requirements,
    /// Nothing would be left after removing the attachments.
    OnlyAttachments,
}

/// Outcome of [`MirrorRule::qualify`].
#[derive(Debug, Clone, PartialEq)]
pub enum Qualification {
    /// The message, stripped of what this rule removes.
    Accepted(MirrorMessage),
    Rejected(Rejection),
}

impl Qualification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// One relay route: source channels, destination webhooks, filters and
/// replacements.
#[derive(Debug)]
pub struct MirrorRule {
    channel_ids: Vec<u64>,
    webhook_urls: Vec<String>,
    ignored_user_ids: HashSet<u64>,
    ignored_role_ids: Vec<u64>,
    requirements: MirrorRequirements,
    options: MirrorOptions,
    replacements: ReplacementSet,
}

impl MirrorRule {
    /// Build the rule of `mirrors[index]`.
    pub fn from_config(index: usize, config: &MirrorConfig) -> Result<Self, ConfigError> {
        let replacements = ReplacementSet::from_configs(&config.replacements).map_err(
            |(replacement, source)| ConfigError::InvalidReplacement {
                mirror: index,
                index: replacement,
                source,
            },
        )?;

        Ok(Self {
            channel_ids: config.channel_ids.iter().map(|id| id.get()).collect(),
            webhook_urls: config.webhook_urls.clone(),
            ignored_user_ids: config.ignored_user_ids.iter().map(|id| id.get()).collect(),
            ignored_role_ids: config.ignored_role_ids.iter().map(|id| id.get()).collect(),
            requirements: MirrorRequirements::from(&config.requirements),
            options: MirrorOptions::from(&config.options),
            replacements,
        })
    }

    pub fn channel_ids(&self) -> &[u64] {
        &self.channel_ids
    }

    pub fn webhook_urls(&self) -> &[String] {
        &self.webhook_urls
    }

    pub fn replacement_count(&self) -> usize {
        self.replacements.len()
    }

    /// Decide whether `message` is mirrored, stripping it on the way.
    ///
    /// Runs the option gate, then the requirement gate, then the strip
    /// step. The strip step mutates the message (attachments removed, a
    /// lone GIF preview dropped) and only runs when both gates passed.
    pub fn qualify(&self, mut message: MirrorMessage, is_update: bool) -> Qualification {
        if !self.meets_options(&message, is_update) {
            return Qualification::Rejected(Rejection::Options);
        }
        if !self.meets_requirements(&message) {
            return Qualification::Rejected(Rejection::Requirements);
        }

        if self.options.remove_attachments {
            if message.contains_only_attachments() {
                return Qualification::Rejected(Rejection::OnlyAttachments);
            }
            message.attachments.clear();
        }
        if message.is_gif() {
            message.embeds.pop();
        }
        Qualification::Accepted(message)
    }

    fn meets_options(&self, message: &MirrorMessage, is_update: bool) -> bool {
        (self.options.mirror_messages_from_bots || !message.author.bot)
            && (self.options.mirror_reply_messages || !message.is_reply)
            && (self.options.mirror_messages_on_edit || !is_update)
    }

    fn meets_requirements(&self, message: &MirrorMessage) -> bool {
        message.content_length() >= self.requirements.min_content_length
            && message.embeds.len() >= self.requirements.min_embeds_count
            && message.attachments.len() >= self.requirements.min_attachments_count
            && !self.ignored_user_ids.contains(&message.author.id)
            && !message.author_has_any_role(&self.ignored_role_ids)
    }

    /// Apply this rule's replacements in order.
    pub fn apply_replacements(&self, message: &mut MirrorMessage) -> Result<(), ReplacementError> {
        self.replacements.apply(message)
    }

    /// Send `message` to every webhook of this rule.
    ///
    /// Each webhook gets its own task, which sends the payloads in order.
    /// A failed send is logged and does not stop the other payloads or
    /// webhooks. The returned handles may be dropped.
    pub fn dispatch_message(
        &self,
        message: MirrorMessage,
        sender: Arc<dyn WebhookSender>,
        on_delivered: DeliveryCallback,
    ) -> Vec<JoinHandle<()>> {
        let payloads = Arc::new(build_payloads(&message, self.options.use_webhook_profile));
        let message = Arc::new(message);

        self.webhook_urls
            .iter()
            .map(|endpoint| {
                let endpoint = endpoint.clone();
                let payloads = Arc::clone(&payloads);
                let message = Arc::clone(&message);
                let sender = Arc::clone(&sender);
                let on_delivered = Arc::clone(&on_delivered);

                tokio::spawn(async move {
                    for (fragment, payload) in payloads.iter().enumerate() {
                        match sender.send(&endpoint, payload).await {
                            Ok(()) => {
                                debug!(
                                    message_id = message.id,
                                    webhook = redact_endpoint(&endpoint),
                                    fragment,
                                    "Mirrored payload"
                                );
                                on_delivered(message.as_ref());
                            }
                            Err(e) => {
                                error!(
                                    message_id = message.id,
                                    webhook = redact_endpoint(&endpoint),
                                    fragment,
                                    "Failed to mirror message: {}",
                                    e
                                );
                            }
                        }
                    }
                })
            })
            .collect()
    }
}
