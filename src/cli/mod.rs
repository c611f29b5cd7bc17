//! CLI commands for ConcealBot using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::clock::{current_time_in, normalize, TimeZoneRegistry};
use crate::config;
use crate::embeds::EmbedStore;
use crate::shutdown;
use crate::telegram::commands::build_timediff_reply;
use crate::telegram::run_telegram_daemon;
use crate::web::run_web_server;

/// ConcealBot - Telegram bot for timezone fan-out and spoiler-free embeds.
#[derive(Parser)]
#[command(name = "concealbot")]
#[command(version = "0.1.0")]
#[command(about = "ConcealBot - spoiler-free links and timezone math", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the bot and the embed server together
    Start,

    /// Run only the Telegram bot
    Bot,

    /// Run only the embed web server
    Web,

    /// Create a default settings file
    Setup,

    /// Convert a time offline (debugging aid)
    Timediff {
        /// Location label, e.g. "Chile"
        location: String,
        /// Time string, e.g. "9:30 PM"; current time when omitted
        time: Option<String>,
    },
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Start => run_start().await,
            Command::Bot => {
                run_telegram_daemon().await?;
                Ok(())
            }
            Command::Web => {
                let settings = config::load_settings()?;
                let store = EmbedStore::open_default()?;
                run_web_server(settings.web.port, store).await?;
                Ok(())
            }
            Command::Setup => {
                let path = config::init_default_settings()?;
                println!("Settings file: {}", path.display());
                println!("Set telegram.bot_token (or export BOT_TOKEN) before starting.");
                Ok(())
            }
            Command::Timediff { location, time } => run_timediff(&location, time.as_deref()),
        }
    }
}

async fn run_start() -> Result<()> {
    let settings = config::load_settings()?;
    let store = EmbedStore::open_default()?;
    let port = settings.web.port;

    let mut web_task = tokio::spawn(run_web_server(port, store));
    let mut bot_task = tokio::spawn(run_telegram_daemon());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl-C received, shutting down");
            shutdown::trigger();
            bot_task.abort();
            // Give the web server its graceful window.
            if let Ok(Err(e)) = web_task.await {
                tracing::error!("Web server error during shutdown: {}", e);
            }
        }
        result = &mut web_task => {
            shutdown::trigger();
            bot_task.abort();
            if let Ok(Err(e)) = result {
                anyhow::bail!("Web server exited: {}", e);
            }
        }
        result = &mut bot_task => {
            shutdown::trigger();
            web_task.abort();
            if let Ok(Err(e)) = result {
                anyhow::bail!("Telegram bot exited: {}", e);
            }
        }
    }

    // Let in-flight deferred replies land their cancellation edits before
    // the process exits.
    shutdown::wait_for_tasks(std::time::Duration::from_secs(5)).await;
    Ok(())
}

fn run_timediff(location: &str, time: Option<&str>) -> Result<()> {
    let settings = config::load_settings().unwrap_or_else(|_| config::default_settings());
    let registry = TimeZoneRegistry::from_entries(&settings.timezones)?;

    let canonical = match time {
        Some(raw) => normalize(raw)?,
        None => current_time_in(location, &registry)?,
    };

    let reply = build_timediff_reply(canonical, location, &registry)?;
    println!("{}", reply);
    Ok(())
}
