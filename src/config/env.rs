//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `MIRROR_DISCORD_TOKEN` - Discord token
//! - `MIRROR_STATUS` - Presence status
//! - `MIRROR_LOG_MESSAGE` - Mirrored message log template
//! - `MIRROR_CONFIG` - Config file path

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "MIRROR";

/// Config file used when `MIRROR_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "mirror.conf";

/// Apply environment variable overrides to a config.
///
/// This allows the token to be provided via the environment instead of
/// the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }
    if let Ok(status) = env::var(format!("{}_STATUS", ENV_PREFIX)) {
        config.discord.status = Some(status);
    }
    if let Ok(log_message) = env::var(format!("{}_LOG_MESSAGE", ENV_PREFIX)) {
        config.log_message = Some(log_message);
    }

    config
}

/// Get the config file path from environment or use default.
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
