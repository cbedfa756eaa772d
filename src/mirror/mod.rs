//! Mirror rules and the message transformations they apply.
//!
//! ## Module Structure
//!
//! - `color`: hex color parsing and the tolerance comparison
//! - `replacement`: find/replace rules and their target locations
//! - `payload`: webhook payload construction and content splitting
//! - `rule`: qualification, replacement and dispatch for one route
//! - `registry`: channel id -> rule lookup

pub mod color;
pub mod payload;
pub mod registry;
pub mod replacement;
pub mod rule;

pub use payload::WebhookPayload;
pub use registry::MirrorRegistry;
pub use rule::{DeliveryCallback, Qualification, Rejection};
