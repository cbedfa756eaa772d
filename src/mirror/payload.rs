//! Webhook payload construction.
//!
//! Discord rejects webhook content over 2000 characters, so long content is
//! split across several payloads. Only the first payload carries the embeds
//! and attachments.

use crate::common::{Attachment, Embed, MirrorMessage};

/// Maximum content length of a single webhook message, in characters.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// One webhook message to send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookPayload {
    pub content: Option<String>,
    /// Display name override.
    pub username: Option<String>,
    /// Avatar override.
    pub avatar_url: Option<String>,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<Embed>,
}

/// Build the payloads for `message`.
///
/// Unless `use_webhook_profile` is set, every payload impersonates the
/// message author.
pub fn build_payloads(message: &MirrorMessage, use_webhook_profile: bool) -> Vec<WebhookPayload> {
    let (username, avatar_url) = if use_webhook_profile {
        (None, None)
    } else {
        (
            Some(message.author.username.clone()),
            message.author.avatar_url.clone(),
        )
    };

    let mut chunks = split_content(&message.content, MAX_CONTENT_LENGTH).into_iter();

    let mut payloads = vec![WebhookPayload {
        content: chunks.next(),
        username: username.clone(),
        avatar_url: avatar_url.clone(),
        attachments: message.attachments.clone(),
        embeds: message.embeds.clone(),
    }];

    payloads.extend(chunks.map(|chunk| WebhookPayload {
        content: Some(chunk),
        username: username.clone(),
        avatar_url: avatar_url.clone(),
        ..Default::default()
    }));

    payloads
}

/// Split `content` into consecutive slices of at most `max_len` characters.
///
/// Never splits inside a multi-byte character. Empty content yields no slice.
pub fn split_content(content: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut remaining = content;

    while !remaining.is_empty() {
        let split_at = remaining
            .char_indices()
            .nth(max_len)
            .map(|(index, _)| index)
            .unwrap_or(remaining.len());
        let (chunk, rest) = remaining.split_at(split_at);
        chunks.push(chunk.to_string());
        remaining = rest;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MessageAuthor;

    fn message(content: String) -> MirrorMessage {
        MirrorMessage {
            author: MessageAuthor {
                id: 1,
                username: "alice".to_string(),
                bot: false,
                avatar_url: Some("https://cdn.example.com/avatar.png".to_string()),
            },
            content,
            embeds: vec![Embed::default()],
            attachments: vec![Attachment {
                url: "https://cdn.example.com/file.txt".to_string(),
                filename: "file.txt".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_limit_is_one_payload() {
        let payloads = build_payloads(&message("a".repeat(2000)), false);
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].content.as_ref().unwrap().len(), 2000);
    }

    #[test]
    fn test_one_over_limit_is_two_payloads() {
        let payloads = build_payloads(&message("a".repeat(2001)), false);
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[1].content.as_deref(), Some("a"));
    }

    #[test]
    fn test_long_content_fully_covered() {
        let content: String = (0..4001).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let payloads = build_payloads(&message(content.clone()), false);
        assert_eq!(payloads.len(), 3);

        let joined: String = payloads.iter().filter_map(|p| p.content.clone()).collect();
        assert_eq!(joined, content);
    }

    #[test]
    fn test_only_first_payload_has_embeds_and_files() {
        let payloads = build_payloads(&message("a".repeat(2500)), false);
        assert_eq!(payloads[0].embeds.len(), 1);
        assert_eq!(payloads[0].attachments.len(), 1);
        assert!(payloads[1].embeds.is_empty());
        assert!(payloads[1].attachments.is_empty());
    }

    #[test]
    fn test_author_profile_override() {
        let payloads = build_payloads(&message("a".repeat(2500)), false);
        for payload in &payloads {
            assert_eq!(payload.username.as_deref(), Some("alice"));
            assert_eq!(
                payload.avatar_url.as_deref(),
                Some("https://cdn.example.com/avatar.png")
            );
        }

        let payloads = build_payloads(&message("hello".to_string()), true);
        assert_eq!(payloads[0].username, None);
        assert_eq!(payloads[0].avatar_url, None);
    }

    #[test]
    fn test_empty_content_is_omitted() {
        let payloads = build_payloads(&message(String::new()), false);
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].content, None);
        assert_eq!(payloads[0].embeds.len(), 1);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let chunks = split_content(&"é".repeat(5), 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }
}
