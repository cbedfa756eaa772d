//! Error types for the application.

use thiserror::Error;

/// Configuration-related errors.
///
/// All of these are fatal at startup: the process does not run with a
/// malformed configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    IoError { path: String, message: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed:\n{message}")]
    ValidationError { message: String },

    #[error("Invalid replacement in mirrors[{mirror}].replacements[{index}]: {source}")]
    InvalidReplacement {
        mirror: usize,
        index: usize,
        #[source]
        source: ReplacementError,
    },
}

/// Errors raised while compiling or applying a replacement rule.
#[derive(Debug, Error)]
pub enum ReplacementError {
    #[error(
        "Invalid color \"{value}\" (only hex is supported). Replace it with a valid hex color (e.g. #3463D9) to fix this error"
    )]
    InvalidColor { value: String },

    #[error("Invalid replacement location \"{value}\"")]
    UnknownLocation { value: String },

    #[error("Invalid replacement pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Replacement pattern '{pattern}' failed to match: {message}")]
    MatchFailed { pattern: String, message: String },
}

/// Errors raised while delivering a payload to a webhook endpoint.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to resolve webhook {endpoint}: {source}")]
    ResolveFailed {
        endpoint: String,
        #[source]
        source: serenity::Error,
    },

    #[error("Failed to download attachment {url}: {source}")]
    AttachmentFailed {
        url: String,
        #[source]
        source: serenity::Error,
    },

    #[error("Webhook {endpoint} rejected payload: {source}")]
    SendFailed {
        endpoint: String,
        #[source]
        source: serenity::Error,
    },

    #[error("No webhook client for endpoint {endpoint}")]
    UnknownEndpoint { endpoint: String },
}
