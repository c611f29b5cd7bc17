//! Telegram integration.

pub mod client;
pub mod commands;
pub mod deferred;
pub mod responder;

pub use client::run_telegram_daemon;
pub use responder::{ChatResponder, MessageRef, TelegramResponder};
