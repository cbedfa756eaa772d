//! Message flow from monitored channels to webhooks.
//!
//! ## Module Structure
//!
//! - `dispatcher`: the dispatch pipeline (`Dispatcher`)
//! - `delivery`: the `WebhookSender` seam between the pipeline and Discord
//! - `log`: the mirrored-message log line

pub mod delivery;
pub mod dispatcher;
pub mod log;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use log::{MessageOrigin, MirrorLog};
