//! Error types for the Telegram notifier.

use thiserror::Error;

/// Errors that can occur while setting up or using the notifier.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Chat id missing or malformed.
    #[error("Invalid chat id: {0}")]
    InvalidChatId(String),

    /// Telegram Bot API request failed.
    #[error("Telegram API error: {0}")]
    Api(String),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

impl From<teloxide::RequestError> for TelegramError {
    fn from(e: teloxide::RequestError) -> Self {
        TelegramError::Api(e.to_string())
    }
}
