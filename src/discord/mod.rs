//! Discord bot integration.
//!
//! This module connects to the gateway, feeds messages from monitored
//! channels into the dispatcher and delivers payloads through webhooks.

pub mod client;
pub mod convert;
pub mod handler;
pub mod webhook;

pub use client::MirrorBotBuilder;
