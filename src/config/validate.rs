//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.
//! Replacement rules are checked separately, when the mirror registry
//! compiles them.

use std::collections::HashMap;

use reqwest::Url;
use serenity::model::user::OnlineStatus;

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Placeholder shipped in the sample config.
const PLACEHOLDER_TOKEN: &str = "YOUR_DISCORD_TOKEN_HERE";

/// Parse a presence status name.
pub fn parse_status(status: &str) -> Option<OnlineStatus> {
    match status.to_lowercase().as_str() {
        "online" => Some(OnlineStatus::Online),
        "idle" => Some(OnlineStatus::Idle),
        "dnd" => Some(OnlineStatus::DoNotDisturb),
        "invisible" => Some(OnlineStatus::Invisible),
        _ => None,
    }
}

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.discord.token.is_empty() {
        errors.push("discord.token is required".to_string());
    }
    if config.discord.token == PLACEHOLDER_TOKEN {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }

    if let Some(ref status) = config.discord.status {
        if parse_status(status).is_none() {
            errors.push(format!(
                "discord.status '{}' is invalid (use: online, idle, dnd, invisible)",
                status
            ));
        }
    }

    for (i, mirror) in config.mirrors.iter().enumerate() {
        if mirror.channel_ids.is_empty() {
            errors.push(format!("mirrors[{}].channel_ids is empty", i));
        }
        for (j, url) in mirror.webhook_urls.iter().enumerate() {
            let valid = Url::parse(url)
                .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
                .unwrap_or(false);
            if !valid {
                errors.push(format!(
                    "mirrors[{}].webhook_urls[{}] is not a valid URL: '{}'",
                    i, j, url
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

/// Channels listed by more than one mirror, with the indexes of those
/// mirrors.
pub fn duplicate_channels(config: &Config) -> Vec<(u64, Vec<usize>)> {
    let mut owners: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, mirror) in config.mirrors.iter().enumerate() {
        for id in &mirror.channel_ids {
            let entry = owners.entry(id.get()).or_default();
            if !entry.contains(&i) {
                entry.push(i);
            }
        }
    }

    let mut duplicates: Vec<(u64, Vec<usize>)> = owners
        .into_iter()
        .filter(|(_, mirrors)| mirrors.len() > 1)
        .collect();
    duplicates.sort_by_key(|(channel, _)| *channel);
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;

    fn make_valid_config() -> Config {
        Config {
            discord: DiscordConfig {
                token: "valid_token_here".to_string(),
                status: Some("online".to_string()),
            },
            log_message: None,
            mirrors: vec![MirrorConfig {
                channel_ids: vec![Snowflake::new(123456789)],
                webhook_urls: vec!["https://discord.com/api/webhooks/1/abc".to_string()],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = make_valid_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_token_fails() {
        let mut config = make_valid_config();
        config.discord.token = String::new();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("discord.token"));
    }

    #[test]
    fn test_placeholder_token_fails() {
        let mut config = make_valid_config();
        config.discord.token = PLACEHOLDER_TOKEN.to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }

    #[test]
    fn test_invalid_status_fails() {
        let mut config = make_valid_config();
        config.discord.status = Some("busy".to_string());

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("discord.status"));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(parse_status("DND"), Some(OnlineStatus::DoNotDisturb));
        assert_eq!(parse_status("idle"), Some(OnlineStatus::Idle));
        assert_eq!(parse_status("away"), None);
    }

    #[test]
    fn test_mirror_without_channels_fails() {
        let mut config = make_valid_config();
        config.mirrors[0].channel_ids.clear();

        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("mirrors[0].channel_ids"));
    }

    #[test]
    fn test_invalid_webhook_url_fails() {
        let mut config = make_valid_config();
        config.mirrors[0].webhook_urls.push("not a url".to_string());
        config.mirrors[0].webhook_urls.push("ftp://example.com/hook".to_string());

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("webhook_urls[1]"));
        assert!(message.contains("webhook_urls[2]"));
        assert!(!message.contains("webhook_urls[0]"));
    }

    #[test]
    fn test_errors_are_collected() {
        let mut config = make_valid_config();
        config.discord.token = String::new();
        config.mirrors[0].channel_ids.clear();

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("discord.token"));
        assert!(message.contains("channel_ids"));
    }

    #[test]
    fn test_duplicate_channels() {
        let mut config = make_valid_config();
        config.mirrors.push(MirrorConfig {
            channel_ids: vec![Snowflake::new(123456789), Snowflake::new(5)],
            ..Default::default()
        });

        assert_eq!(duplicate_channels(&config), vec![(123456789, vec![0, 1])]);
        assert!(duplicate_channels(&make_valid_config()).is_empty());
    }
}
