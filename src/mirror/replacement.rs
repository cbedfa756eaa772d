//! Text and color replacements applied to mirrored messages.
//!
//! A [`Replacement`] is one find/replace rule scoped to a location of the
//! message: the content, one embed property, or the embed color. A
//! [`ReplacementSet`] applies its replacements in configuration order, so a
//! later replacement sees the output of the earlier ones.

use std::fmt;
use std::str::FromStr;

use fancy_regex::Regex;

use crate::common::{Embed, EmbedField, MirrorMessage, ReplacementError};
use crate::config::types::ReplacementConfig;

use super::color::{
    hex_colors_are_equal, is_valid_hex_color, parse_hex_color, to_hex_color,
    DEFAULT_COLOR_TOLERANCE, DEFAULT_EMBED_COLOR,
};

/// Pattern value that replaces the whole content.
const WILDCARD: &str = "*";

/// Where in a message a replacement applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplacementLocation {
    #[default]
    Everywhere,
    MessageContent,
    EmbedAuthor,
    EmbedAuthorUrl,
    EmbedAuthorIconUrl,
    EmbedTitle,
    EmbedDescription,
    EmbedUrl,
    EmbedFieldName,
    EmbedFieldValue,
    EmbedImageUrl,
    EmbedThumbnailUrl,
    EmbedFooter,
    EmbedFooterIconUrl,
    EmbedColor,
}

/// Text locations visited by [`ReplacementLocation::Everywhere`], in order.
const EVERYWHERE_TEXT_LOCATIONS: [ReplacementLocation; 13] = [
    ReplacementLocation::MessageContent,
    ReplacementLocation::EmbedTitle,
    ReplacementLocation::EmbedAuthor,
    ReplacementLocation::EmbedAuthorUrl,
    ReplacementLocation::EmbedAuthorIconUrl,
    ReplacementLocation::EmbedDescription,
    ReplacementLocation::EmbedFieldName,
    ReplacementLocation::EmbedFieldValue,
    ReplacementLocation::EmbedImageUrl,
    ReplacementLocation::EmbedThumbnailUrl,
    ReplacementLocation::EmbedFooter,
    ReplacementLocation::EmbedFooterIconUrl,
    ReplacementLocation::EmbedUrl,
];

impl ReplacementLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Everywhere => "everywhere",
            Self::MessageContent => "message_content",
            Self::EmbedAuthor => "embed_author",
            Self::EmbedAuthorUrl => "embed_author_url",
            Self::EmbedAuthorIconUrl => "embed_author_icon_url",
            Self::EmbedTitle => "embed_title",
            Self::EmbedDescription => "embed_description",
            Self::EmbedUrl => "embed_url",
            Self::EmbedFieldName => "embed_field_name",
            Self::EmbedFieldValue => "embed_field_value",
            Self::EmbedImageUrl => "embed_image_url",
            Self::EmbedThumbnailUrl => "embed_thumbnail_url",
            Self::EmbedFooter => "embed_footer",
            Self::EmbedFooterIconUrl => "embed_footer_icon_url",
            Self::EmbedColor => "embed_color",
        }
    }

    /// The string field this location edits, or `None` for the
    /// color and everywhere locations.
    fn text_target(self) -> Option<TextTarget> {
        let target = match self {
            Self::Everywhere | Self::EmbedColor => return None,
            Self::MessageContent => TextTarget::Content,
            Self::EmbedAuthor => TextTarget::Embed(embed_author_name),
            Self::EmbedAuthorUrl => TextTarget::Embed(embed_author_url),
            Self::EmbedAuthorIconUrl => TextTarget::Embed(embed_author_icon_url),
            Self::EmbedTitle => TextTarget::Embed(embed_title),
            Self::EmbedDescription => TextTarget::Embed(embed_description),
            Self::EmbedUrl => TextTarget::Embed(embed_url),
            Self::EmbedFieldName => TextTarget::Field(field_name),
            Self::EmbedFieldValue => TextTarget::Field(field_value),
            Self::EmbedImageUrl => TextTarget::Embed(embed_image_url),
            Self::EmbedThumbnailUrl => TextTarget::Embed(embed_thumbnail_url),
            Self::EmbedFooter => TextTarget::Embed(embed_footer_text),
            Self::EmbedFooterIconUrl => TextTarget::Embed(embed_footer_icon_url),
        };
        Some(target)
    }
}

impl FromStr for ReplacementLocation {
    type Err = ReplacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let location = match s {
            "everywhere" => Self::Everywhere,
            "message_content" => Self::MessageContent,
            "embed_author" => Self::EmbedAuthor,
            "embed_author_url" => Self::EmbedAuthorUrl,
            "embed_author_icon_url" => Self::EmbedAuthorIconUrl,
            "embed_title" => Self::EmbedTitle,
            "embed_description" => Self::EmbedDescription,
            "embed_url" => Self::EmbedUrl,
            "embed_field_name" => Self::EmbedFieldName,
            "embed_field_value" => Self::EmbedFieldValue,
            "embed_image_url" => Self::EmbedImageUrl,
            "embed_thumbnail_url" => Self::EmbedThumbnailUrl,
            "embed_footer" => Self::EmbedFooter,
            "embed_footer_icon_url" => Self::EmbedFooterIconUrl,
            "embed_color" => Self::EmbedColor,
            other => {
                return Err(ReplacementError::UnknownLocation {
                    value: other.to_string(),
                })
            }
        };
        Ok(location)
    }
}

impl fmt::Display for ReplacementLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string field reachable from a message.
#[derive(Clone, Copy)]
enum TextTarget {
    Content,
    /// An optional property of every embed. Absent properties are skipped.
    Embed(fn(&mut Embed) -> Option<&mut String>),
    /// A property of every field of every embed.
    Field(fn(&mut EmbedField) -> &mut String),
}

fn embed_author_name(embed: &mut Embed) -> Option<&mut String> {
    embed.author.as_mut().map(|author| &mut author.name)
}

fn embed_author_url(embed: &mut Embed) -> Option<&mut String> {
    embed.author.as_mut().and_then(|author| author.url.as_mut())
}

fn embed_author_icon_url(embed: &mut Embed) -> Option<&mut String> {
    embed.author.as_mut().and_then(|author| author.icon_url.as_mut())
}

fn embed_title(embed: &mut Embed) -> Option<&mut String> {
    embed.title.as_mut()
}

fn embed_description(embed: &mut Embed) -> Option<&mut String> {
    embed.description.as_mut()
}

fn embed_url(embed: &mut Embed) -> Option<&mut String> {
    embed.url.as_mut()
}

fn embed_image_url(embed: &mut Embed) -> Option<&mut String> {
    embed.image_url.as_mut()
}

fn embed_thumbnail_url(embed: &mut Embed) -> Option<&mut String> {
    embed.thumbnail_url.as_mut()
}

fn embed_footer_text(embed: &mut Embed) -> Option<&mut String> {
    embed.footer.as_mut().map(|footer| &mut footer.text)
}

fn embed_footer_icon_url(embed: &mut Embed) -> Option<&mut String> {
    embed.footer.as_mut().and_then(|footer| footer.icon_url.as_mut())
}

fn field_name(field: &mut EmbedField) -> &mut String {
    &mut field.name
}

fn field_value(field: &mut EmbedField) -> &mut String {
    &mut field.value
}

/// A compiled find/replace rule.
#[derive(Debug, Clone)]
pub struct Replacement {
    /// Pattern as written in the config.
    source: String,
    regex: Regex,
    replacement: String,
    location: ReplacementLocation,
}

impl Replacement {
    /// Compile a replacement.
    ///
    /// Patterns match case-insensitively and replace every occurrence.
    /// `*` matches the whole text, newlines included. An explicit
    /// `embed_color` location requires both strings to be `#RRGGBB` colors.
    pub fn new(
        pattern: &str,
        replacement: &str,
        location: ReplacementLocation,
    ) -> Result<Self, ReplacementError> {
        if location == ReplacementLocation::EmbedColor {
            for value in [pattern, replacement] {
                if !is_valid_hex_color(value) {
                    return Err(ReplacementError::InvalidColor {
                        value: value.to_string(),
                    });
                }
            }
        }

        let expression = if pattern == WILDCARD {
            "(?s)^.*".to_string()
        } else {
            format!("(?i){}", pattern)
        };
        let regex = Regex::new(&expression).map_err(|e| ReplacementError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            replacement: replacement.to_string(),
            location,
        })
    }

    /// Compile a replacement from its config entry.
    pub fn from_config(config: &ReplacementConfig) -> Result<Self, ReplacementError> {
        let location = match config.location.as_deref() {
            Some(location) => location.parse()?,
            None => ReplacementLocation::default(),
        };
        Self::new(&config.pattern, &config.replacement, location)
    }

    /// Apply this replacement to `message` in place.
    pub fn apply(&self, message: &mut MirrorMessage) -> Result<(), ReplacementError> {
        match self.location {
            ReplacementLocation::Everywhere => {
                for location in EVERYWHERE_TEXT_LOCATIONS {
                    if let Some(target) = location.text_target() {
                        self.replace_text(target, message)?;
                    }
                }
                self.try_replace_color(message)
            }
            ReplacementLocation::EmbedColor => self.replace_color(message),
            location => match location.text_target() {
                Some(target) => self.replace_text(target, message),
                None => Ok(()),
            },
        }
    }

    fn replace_text(
        &self,
        target: TextTarget,
        message: &mut MirrorMessage,
    ) -> Result<(), ReplacementError> {
        match target {
            TextTarget::Content => self.replace_in(&mut message.content),
            TextTarget::Embed(property) => {
                for embed in &mut message.embeds {
                    if let Some(value) = property(embed) {
                        if !value.is_empty() {
                            self.replace_in(value)?;
                        }
                    }
                }
                Ok(())
            }
            TextTarget::Field(property) => {
                for embed in &mut message.embeds {
                    for field in &mut embed.fields {
                        self.replace_in(property(field))?;
                    }
                }
                Ok(())
            }
        }
    }

    fn replace_in(&self, text: &mut String) -> Result<(), ReplacementError> {
        let replaced = self
            .regex
            .try_replacen(text.as_str(), 0, self.replacement.as_str())
            .map_err(|e| ReplacementError::MatchFailed {
                pattern: self.source.clone(),
                message: e.to_string(),
            })?;
        let replaced = replaced.into_owned();
        *text = replaced;
        Ok(())
    }

    /// Color replacement under `everywhere`: only attempted when the pattern
    /// happens to be a hex color, and only then is the replacement checked.
    fn try_replace_color(&self, message: &mut MirrorMessage) -> Result<(), ReplacementError> {
        if !is_valid_hex_color(&self.source) {
            return Ok(());
        }
        self.replace_color(message)
    }

    fn replace_color(&self, message: &mut MirrorMessage) -> Result<(), ReplacementError> {
        let color =
            parse_hex_color(&self.replacement).ok_or_else(|| ReplacementError::InvalidColor {
                value: self.replacement.clone(),
            })?;

        for embed in &mut message.embeds {
            let current = embed
                .color
                .map(to_hex_color)
                .unwrap_or_else(|| DEFAULT_EMBED_COLOR.to_string());
            if hex_colors_are_equal(&current, &self.source, DEFAULT_COLOR_TOLERANCE) {
                embed.color = Some(color);
            }
        }
        Ok(())
    }
}

/// Ordered replacements of one mirror.
#[derive(Debug, Clone, Default)]
pub struct ReplacementSet {
    replacements: Vec<Replacement>,
}

impl ReplacementSet {
    pub fn new(replacements: Vec<Replacement>) -> Self {
        Self { replacements }
    }

    /// Compile every config entry, failing on the first invalid one.
    ///
    /// The error carries the index of the offending entry.
    pub fn from_configs(
        configs: &[ReplacementConfig],
    ) -> Result<Self, (usize, ReplacementError)> {
        let replacements = configs
            .iter()
            .enumerate()
            .map(|(index, config)| Replacement::from_config(config).map_err(|e| (index, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(replacements))
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// Apply all replacements in order.
    ///
    /// Stops at the first failure; earlier replacements stay applied.
    pub fn apply(&self, message: &mut MirrorMessage) -> Result<(), ReplacementError> {
        for replacement in &self.replacements {
            replacement.apply(message)?;
        }
        Ok(())
    }
}
