//! ConcealBot library root.

pub mod cli;
pub mod clock;
pub mod config;
pub mod embeds;
pub mod error;
pub mod logging;
pub mod shutdown;
pub mod telegram;
pub mod video;
pub mod web;

pub use cli::Commands;
pub use clock::{convert, normalize, CanonicalTime, TimeZoneRegistry};
pub use config::{load_settings, Settings};
pub use embeds::{EmbedRecord, EmbedStore};
pub use error::{Error, Result};
pub use telegram::run_telegram_daemon;
pub use video::extract_video_id;
pub use web::run_web_server;
