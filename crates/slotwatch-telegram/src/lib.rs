//! Telegram notifications for slotwatch.
//!
//! Claimed slots are announced to a single chat through the Telegram Bot API.
//!
//! # Environment Variables
//!
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//!
//! # Example
//!
//! ```no_run
//! use slotwatch_runtime::Notifier;
//! use slotwatch_telegram::TelegramNotifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let notifier = TelegramNotifier::from_env(123456789)?;
//!     notifier.send_message("slot occupied at 2026-10-20 09:45:00").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod notifier;

pub use error::{Result, TelegramError};
pub use notifier::{TelegramNotifier, TOKEN_ENV};
