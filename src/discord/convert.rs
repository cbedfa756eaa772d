//! Conversions between serenity models and mirror types.

use serenity::builder::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};
use serenity::model::channel::{Message, MessageFlags, MessageType};

use crate::common::{
    Attachment, Embed, EmbedAuthor, EmbedField, EmbedFooter, MessageAuthor, MirrorMessage,
};

/// Message kinds that carry user content. Everything else (joins, pins,
/// boosts, ...) counts as a system message.
fn is_user_message(kind: MessageType) -> bool {
    matches!(
        kind,
        MessageType::Regular
            | MessageType::InlineReply
            | MessageType::ChatInputCommand
            | MessageType::ContextMenuCommand
    )
}

impl From<&Message> for MirrorMessage {
    fn from(message: &Message) -> Self {
        let has_flag = |flag: MessageFlags| message.flags.is_some_and(|flags| flags.contains(flag));

        Self {
            id: message.id.get(),
            channel_id: message.channel_id.get(),
            guild_id: message.guild_id.map(|id| id.get()),
            author: MessageAuthor {
                id: message.author.id.get(),
                username: message.author.name.clone(),
                bot: message.author.bot,
                avatar_url: message.author.avatar_url(),
            },
            content: message.content.clone(),
            embeds: message.embeds.iter().map(Embed::from).collect(),
            attachments: message
                .attachments
                .iter()
                .map(|attachment| Attachment {
                    url: attachment.url.clone(),
                    filename: attachment.filename.clone(),
                })
                .collect(),
            is_reply: message.message_reference.is_some(),
            member_roles: message
                .member
                .as_ref()
                .map(|member| member.roles.iter().map(|role| role.get()).collect()),
            system: !is_user_message(message.kind),
            ephemeral: has_flag(MessageFlags::EPHEMERAL),
            crossposted: has_flag(MessageFlags::CROSSPOSTED),
        }
    }
}

impl From<&serenity::model::channel::Embed> for Embed {
    fn from(embed: &serenity::model::channel::Embed) -> Self {
        Self {
            author: embed.author.as_ref().map(|author| EmbedAuthor {
                name: author.name.clone(),
                url: author.url.clone(),
                icon_url: author.icon_url.clone(),
            }),
            title: embed.title.clone(),
            description: embed.description.clone(),
            url: embed.url.clone(),
            fields: embed
                .fields
                .iter()
                .map(|field| EmbedField {
                    name: field.name.clone(),
                    value: field.value.clone(),
                    inline: field.inline,
                })
                .collect(),
            image_url: embed.image.as_ref().map(|image| image.url.clone()),
            thumbnail_url: embed.thumbnail.as_ref().map(|thumbnail| thumbnail.url.clone()),
            footer: embed.footer.as_ref().map(|footer| EmbedFooter {
                text: footer.text.clone(),
                icon_url: footer.icon_url.clone(),
            }),
            color: embed.colour.map(|colour| colour.0),
            provider: embed
                .provider
                .as_ref()
                .map(|provider| provider.name.clone().unwrap_or_default()),
            timestamp: embed.timestamp,
        }
    }
}

/// Build the serenity embed sent through a webhook.
pub fn create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();

    if let Some(ref author) = embed.author {
        let mut create_author = CreateEmbedAuthor::new(author.name.as_str());
        if let Some(ref url) = author.url {
            create_author = create_author.url(url.as_str());
        }
        if let Some(ref icon_url) = author.icon_url {
            create_author = create_author.icon_url(icon_url.as_str());
        }
        builder = builder.author(create_author);
    }
    if let Some(ref title) = embed.title {
        builder = builder.title(title.as_str());
    }
    if let Some(ref description) = embed.description {
        builder = builder.description(description.as_str());
    }
    if let Some(ref url) = embed.url {
        builder = builder.url(url.as_str());
    }
    for field in &embed.fields {
        builder = builder.field(field.name.as_str(), field.value.as_str(), field.inline);
    }
    if let Some(ref image_url) = embed.image_url {
        builder = builder.image(image_url.as_str());
    }
    if let Some(ref thumbnail_url) = embed.thumbnail_url {
        builder = builder.thumbnail(thumbnail_url.as_str());
    }
    if let Some(ref footer) = embed.footer {
        let mut create_footer = CreateEmbedFooter::new(footer.text.as_str());
        if let Some(ref icon_url) = footer.icon_url {
            create_footer = create_footer.icon_url(icon_url.as_str());
        }
        builder = builder.footer(create_footer);
    }
    if let Some(color) = embed.color {
        builder = builder.colour(color);
    }
    if let Some(timestamp) = embed.timestamp {
        builder = builder.timestamp(timestamp);
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_kinds() {
        assert!(is_user_message(MessageType::Regular));
        assert!(is_user_message(MessageType::InlineReply));
        assert!(!is_user_message(MessageType::PinsAdd));
        assert!(!is_user_message(MessageType::MemberJoin));
    }
}
