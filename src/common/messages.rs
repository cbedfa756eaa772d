//! Canonical message types for the mirror pipeline.
//!
//! These are the platform-independent view of a chat message that the
//! mirror rules read and mutate. The Discord side converts serenity's
//! models into these (see `discord::convert`).

use serenity::model::Timestamp;

/// Author of a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageAuthor {
    pub id: u64,
    pub username: String,
    pub bot: bool,
    pub avatar_url: Option<String>,
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub url: String,
    pub filename: String,
}

/// Embed author block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

/// A single name/value field of an embed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed footer block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// Rich embed attached to a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Embed {
    pub author: Option<EmbedAuthor>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub fields: Vec<EmbedField>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub footer: Option<EmbedFooter>,
    /// RGB color as a 24-bit integer.
    pub color: Option<u32>,
    /// Provider name of an auto-generated preview (GIFs, link unfurls).
    pub provider: Option<String>,
    pub timestamp: Option<Timestamp>,
}

/// A message received from a monitored channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirrorMessage {
    pub id: u64,
    pub channel_id: u64,
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub author: MessageAuthor,
    pub content: String,
    pub embeds: Vec<Embed>,
    pub attachments: Vec<Attachment>,
    /// Whether the message replies to another message.
    pub is_reply: bool,
    /// Role ids of the author, when the message was sent in a guild.
    pub member_roles: Option<Vec<u64>>,
    pub system: bool,
    pub ephemeral: bool,
    pub crossposted: bool,
}

impl MirrorMessage {
    /// Number of characters (not bytes) in the content.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }

    /// True if there is no text, no embed and no attachment.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.embeds.is_empty() && self.attachments.is_empty()
    }

    /// True if the message carries attachments and nothing else.
    pub fn contains_only_attachments(&self) -> bool {
        !self.attachments.is_empty() && self.content.is_empty() && self.embeds.is_empty()
    }

    /// True if the only embed is a provider preview, e.g. a GIF.
    pub fn is_gif(&self) -> bool {
        matches!(self.embeds.as_slice(), [embed] if embed.provider.is_some())
    }

    /// True if the author holds any of the given roles.
    ///
    /// Always false outside a guild context.
    pub fn author_has_any_role(&self, role_ids: &[u64]) -> bool {
        self.member_roles
            .as_ref()
            .is_some_and(|roles| roles.iter().any(|role| role_ids.contains(role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment() -> Attachment {
        Attachment {
            url: "https://cdn.example.com/a.png".to_string(),
            filename: "a.png".to_string(),
        }
    }

    #[test]
    fn test_empty_message() {
        let message = MirrorMessage::default();
        assert!(message.is_empty());
        assert!(!message.contains_only_attachments());
    }

    #[test]
    fn test_contains_only_attachments() {
        let mut message = MirrorMessage {
            attachments: vec![attachment()],
            ..Default::default()
        };
        assert!(message.contains_only_attachments());

        message.content = "caption".to_string();
        assert!(!message.contains_only_attachments());
    }

    #[test]
    fn test_is_gif_requires_single_provider_embed() {
        let gif = Embed {
            provider: Some("Tenor".to_string()),
            ..Default::default()
        };
        let mut message = MirrorMessage {
            embeds: vec![gif.clone()],
            ..Default::default()
        };
        assert!(message.is_gif());

        message.embeds.push(gif);
        assert!(!message.is_gif());

        message.embeds = vec![Embed::default()];
        assert!(!message.is_gif());
    }

    #[test]
    fn test_content_length_counts_chars() {
        let message = MirrorMessage {
            content: "café".to_string(),
            ..Default::default()
        };
        assert_eq!(message.content_length(), 4);
    }

    #[test]
    fn test_author_roles() {
        let mut message = MirrorMessage::default();
        assert!(!message.author_has_any_role(&[1]));

        message.member_roles = Some(vec![5, 7]);
        assert!(message.author_has_any_role(&[1, 7]));
        assert!(!message.author_has_any_role(&[1, 2]));
        assert!(!message.author_has_any_role(&[]));
    }
}
