//! Lookup from monitored channel to its mirror rule.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::common::ConfigError;
use crate::config::types::MirrorConfig;

use super::rule::MirrorRule;

/// Maps each monitored channel id to the rule that owns it.
///
/// Several channels may share one rule. Built once at startup and never
/// modified afterwards.
#[derive(Debug, Default)]
pub struct MirrorRegistry {
    rules: Vec<Arc<MirrorRule>>,
    by_channel: HashMap<u64, Arc<MirrorRule>>,
}

impl MirrorRegistry {
    /// Build every mirror of the config.
    ///
    /// Fails on the first mirror with an invalid replacement. Mirrors
    /// without channels are skipped. A channel listed by several mirrors
    /// belongs to the last one.
    pub fn from_config(mirrors: &[MirrorConfig]) -> Result<Self, ConfigError> {
        let mut registry = Self::default();

        for (index, config) in mirrors.iter().enumerate() {
            if config.channel_ids.is_empty() {
                warn!("mirrors[{}] has no channel_ids, skipping", index);
                continue;
            }

            let rule = Arc::new(MirrorRule::from_config(index, config)?);
            for &channel_id in rule.channel_ids() {
                registry.by_channel.insert(channel_id, Arc::clone(&rule));
            }
            registry.rules.push(rule);
        }

        Ok(registry)
    }

    /// The rule owning `channel_id`, if the channel is mirrored.
    pub fn get(&self, channel_id: u64) -> Option<&Arc<MirrorRule>> {
        self.by_channel.get(&channel_id)
    }

    /// All rules, in config order.
    pub fn rules(&self) -> &[Arc<MirrorRule>] {
        &self.rules
    }

    /// Every distinct webhook URL used by any rule.
    pub fn webhook_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = Vec::new();
        for url in self.rules.iter().flat_map(|rule| rule.webhook_urls()) {
            if !urls.contains(&url.as_str()) {
                urls.push(url);
            }
        }
        urls
    }

    pub fn channel_count(&self) -> usize {
        self.by_channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_channel.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{ReplacementConfig, Snowflake};

    fn mirror(channels: &[u64], webhook: &str) -> MirrorConfig {
        MirrorConfig {
            channel_ids: channels.iter().copied().map(Snowflake::new).collect(),
            webhook_urls: vec![webhook.to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_channels_share_rule() {
        let registry =
            MirrorRegistry::from_config(&[mirror(&[1, 2], "https://a"), mirror(&[3], "https://b")])
                .unwrap();

        assert_eq!(registry.channel_count(), 3);
        assert_eq!(registry.rules().len(), 2);
        assert!(Arc::ptr_eq(
            registry.get(1).unwrap(),
            registry.get(2).unwrap()
        ));
        assert!(!Arc::ptr_eq(
            registry.get(1).unwrap(),
            registry.get(3).unwrap()
        ));
    }

    #[test]
    fn test_unmirrored_channel() {
        let registry = MirrorRegistry::from_config(&[mirror(&[1], "https://a")]).unwrap();
        assert!(registry.get(99).is_none());
    }

    #[test]
    fn test_mirror_without_channels_is_skipped() {
        let registry =
            MirrorRegistry::from_config(&[mirror(&[], "https://a"), mirror(&[5], "https://b")])
                .unwrap();
        assert_eq!(registry.rules().len(), 1);
        assert_eq!(registry.get(5).unwrap().webhook_urls(), ["https://b"]);
    }

    #[test]
    fn test_last_mirror_wins_duplicate_channel() {
        let registry =
            MirrorRegistry::from_config(&[mirror(&[1], "https://a"), mirror(&[1], "https://b")])
                .unwrap();
        assert_eq!(registry.get(1).unwrap().webhook_urls(), ["https://b"]);
    }

    #[test]
    fn test_webhook_urls_are_distinct() {
        let registry = MirrorRegistry::from_config(&[
            mirror(&[1], "https://a"),
            mirror(&[2], "https://a"),
            mirror(&[3], "https://b"),
        ])
        .unwrap();
        assert_eq!(registry.webhook_urls(), vec!["https://a", "https://b"]);
    }

    #[test]
    fn test_invalid_mirror_fails_whole_registry() {
        let mut broken = mirror(&[2], "https://b");
        broken.replacements.push(ReplacementConfig {
            pattern: "foo".to_string(),
            replacement: "bar".to_string(),
            location: Some("somewhere".to_string()),
        });

        let err = MirrorRegistry::from_config(&[mirror(&[1], "https://a"), broken]).unwrap_err();
        assert!(err.to_string().contains("mirrors[1].replacements[0]"));
        assert!(err.to_string().contains("somewhere"));
    }
}
