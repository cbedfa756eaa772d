//! Common types shared across the application.

pub mod error;
pub mod messages;

pub use error::{ConfigError, DeliveryError, ReplacementError};
pub use messages::{
    Attachment, Embed, EmbedAuthor, EmbedField, EmbedFooter, MessageAuthor, MirrorMessage,
};
