//! Telegram bot client - simple polling version.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::RequestError;

use crate::clock::TimeZoneRegistry;
use crate::config::{load_settings, Settings, WebConfig};
use crate::embeds::EmbedStore;
use crate::error::Error;
use crate::shutdown;

use super::commands::{cmd_spoilless, cmd_timediff, help_text};
use super::responder::TelegramResponder;

/// Everything the message handlers need, built once at startup. Editing
/// settings.json requires a restart to take effect.
pub(crate) struct BotContext {
    pub(crate) registry: TimeZoneRegistry,
    pub(crate) store: EmbedStore,
    pub(crate) web: WebConfig,
}

impl BotContext {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self, Error> {
        Ok(Self {
            registry: TimeZoneRegistry::from_entries(&settings.timezones)?,
            store: EmbedStore::open_default()?,
            web: settings.web.clone(),
        })
    }
}

/// Run the telegram bot daemon using simple polling.
pub async fn run_telegram_daemon() -> Result<(), Error> {
    tracing::info!("Starting Telegram bot...");

    let settings = load_settings()?;
    let token = settings.bot_token()?;
    let context = Arc::new(BotContext::from_settings(&settings)?);

    let bot = Bot::new(token);

    if let Err(e) = bot
        .set_my_commands(vec![
            teloxide::types::BotCommand::new("help", "Show help"),
            teloxide::types::BotCommand::new("timediff", "Convert a time to all other timezones"),
            teloxide::types::BotCommand::new("spoilless", "Spoiler-free YouTube link"),
        ])
        .await
    {
        tracing::warn!("Failed to set commands: {}", e);
    }

    tracing::info!("Telegram bot commands set");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let context = Arc::clone(&context);
        async move { handle_message(bot, msg, context).await }
    })
    .await;

    Ok(())
}

/// Handle incoming messages. Only slash commands are acted on.
async fn handle_message(
    bot: Bot,
    msg: Message,
    context: Arc<BotContext>,
) -> Result<(), RequestError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if !text.starts_with('/') {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let (cmd, args) = split_command(text);

    let outcome = match cmd.as_str() {
        "/help" | "/start" => dispatch_help(&bot, chat_id, &context).await,
        "/timediff" => dispatch_timediff(&bot, chat_id, &context, args).await,
        "/spoilless" => dispatch_spoilless(&bot, chat_id, &context, args).await,
        _ => {
            bot.send_message(chat_id, "Unknown command. /help for available commands.")
                .await
                .map(|_| ())
                .map_err(|e| Error::Telegram(format!("send_message: {}", e)))
        }
    };

    if let Err(e) = outcome {
        tracing::error!("Command {} failed: {}", cmd, e);
        bot.send_message(chat_id, "Internal error. Please try again later.")
            .await?;
    }

    Ok(())
}

/// Split "/cmd@botname rest of args" into the bare command and its args.
fn split_command(text: &str) -> (String, &str) {
    let mut parts = text.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();
    let cmd = head.split('@').next().unwrap_or(head).to_string();
    (cmd, args)
}

async fn dispatch_help(bot: &Bot, chat_id: ChatId, context: &BotContext) -> Result<(), Error> {
    bot.send_message(chat_id, help_text(&context.registry))
        .await
        .map_err(|e| Error::Telegram(format!("send_message: {}", e)))?;
    Ok(())
}

async fn dispatch_timediff(
    bot: &Bot,
    chat_id: ChatId,
    context: &BotContext,
    args: &str,
) -> Result<(), Error> {
    let responder = TelegramResponder::new(bot.clone(), chat_id);
    cmd_timediff(&responder, &context.registry, args).await
}

async fn dispatch_spoilless(
    bot: &Bot,
    chat_id: ChatId,
    context: &BotContext,
    args: &str,
) -> Result<(), Error> {
    let responder = Arc::new(TelegramResponder::new(bot.clone(), chat_id));

    cmd_spoilless(
        responder,
        context.store.clone(),
        context.web.clone(),
        shutdown::subscribe(),
        args,
    )
    .await?;
    Ok(())
}
