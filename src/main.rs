//! ConcealBot - Telegram bot for timezone fan-out and spoiler-free embeds.

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod clock;
mod config;
mod embeds;
mod error;
mod logging;
mod shutdown;
mod telegram;
mod video;
mod web;

use cli::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    // Parse command line arguments
    let args = Commands::parse();

    // Run the command
    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
