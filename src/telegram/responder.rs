//! Narrow chat-response capability used by command handlers.

use async_trait::async_trait;
use teloxide::prelude::*;

use crate::error::{Error, Result};

/// Handle to a previously sent message, used for later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef(pub i32);

/// Send/edit surface injected into command handlers. Keeping it this narrow
/// lets the deferred state machine be tested without a live bot session.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn send(&self, text: &str) -> Result<MessageRef>;
    async fn edit(&self, message: MessageRef, text: &str) -> Result<()>;
}

/// Production responder bound to one chat.
pub struct TelegramResponder {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramResponder {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ChatResponder for TelegramResponder {
    async fn send(&self, text: &str) -> Result<MessageRef> {
        let message = self
            .bot
            .send_message(self.chat_id, text)
            .await
            .map_err(|e| Error::Telegram(format!("send_message: {}", e)))?;
        Ok(MessageRef(message.id.0))
    }

    async fn edit(&self, message: MessageRef, text: &str) -> Result<()> {
        self.bot
            .edit_message_text(self.chat_id, teloxide::types::MessageId(message.0), text)
            .await
            .map_err(|e| Error::Telegram(format!("edit_message_text: {}", e)))?;
        Ok(())
    }
}
