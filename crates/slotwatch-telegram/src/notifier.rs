//! Notifier backed by the Telegram Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::debug;

use slotwatch_runtime::{Notifier, NotifyError};

use crate::error::{Result, TelegramError};

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Sends plain-text messages to a single chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id` using `token`.
    pub fn new(token: impl Into<String>, chat_id: i64) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TelegramError::NoToken);
        }
        if chat_id == 0 {
            return Err(TelegramError::InvalidChatId(chat_id.to_string()));
        }

        Ok(Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        })
    }

    /// Create a notifier reading the token from `TELEGRAM_BOT_TOKEN`.
    pub fn from_env(chat_id: i64) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| TelegramError::NoToken)?;
        Self::new(token, chat_id)
    }

    /// Chat the messages go to.
    pub fn chat_id(&self) -> i64 {
        self.chat_id.0
    }

    /// Send `text`, surfacing API failures.
    pub async fn send(&self, text: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, text).await?;
        debug!(chat_id = %self.chat_id, "telegram message delivered");
        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id.0)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> std::result::Result<(), NotifyError> {
        self.send(text)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}
