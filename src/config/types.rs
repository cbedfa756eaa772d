//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    /// Template logged for every mirrored payload. Empty disables it.
    #[serde(default)]
    pub log_message: Option<String>,
    #[serde(default)]
    pub mirrors: Vec<MirrorConfig>,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    /// Presence status: online, idle, dnd or invisible.
    #[serde(default)]
    pub status: Option<String>,
}

/// One mirror: source channels, destinations, filters and replacements.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub channel_ids: Vec<Snowflake>,
    #[serde(default)]
    pub webhook_urls: Vec<String>,
    #[serde(default)]
    pub ignored_user_ids: Vec<Snowflake>,
    #[serde(default)]
    pub ignored_role_ids: Vec<Snowflake>,
    #[serde(default)]
    pub requirements: RequirementsConfig,
    #[serde(default)]
    pub options: OptionsConfig,
    /// Applied in order.
    #[serde(default)]
    pub replacements: Vec<ReplacementConfig>,
}

/// Minimum message sizes. Missing values mean 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequirementsConfig {
    pub min_embeds_count: Option<usize>,
    pub min_content_length: Option<usize>,
    pub min_attachments_count: Option<usize>,
}

/// Mirror behavior switches. Missing values take the defaults of
/// `MirrorOptions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsConfig {
    pub use_webhook_profile: Option<bool>,
    pub remove_attachments: Option<bool>,
    pub mirror_messages_from_bots: Option<bool>,
    pub mirror_reply_messages: Option<bool>,
    pub mirror_messages_on_edit: Option<bool>,
}

/// A find/replace rule as written in the config.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementConfig {
    /// Regular expression, `*` for the whole text, or a `#RRGGBB` color.
    #[serde(rename = "replace")]
    pub pattern: String,
    /// Replacement text. Capture groups are written `$1` or `${name}`; a
    /// group followed by letters, digits or `_` needs braces (`${1}x`),
    /// since `$1x` refers to a group named `1x`.
    #[serde(rename = "with")]
    pub replacement: String,
    /// Target location, `everywhere` when missing.
    #[serde(rename = "where", default)]
    pub location: Option<String>,
}

/// A Discord id, written either as a number or as a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snowflake(u64);

impl Snowflake {
    #[cfg(test)]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Ok(Self(id)),
            Raw::Text(text) => text.trim().parse().map(Self).map_err(|_| {
                serde::de::Error::custom(format!("'{}' is not a valid Discord id", text))
            }),
        }
    }
}
