//! Error types for the command-line interface.

use thiserror::Error;

use slotwatch_client::ClientError;
use slotwatch_runtime::RuntimeError;
use slotwatch_telegram::TelegramError;

/// Errors surfaced to the user by the `slotwatch` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error("config: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error("input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Nothing is waiting for evaluation.
    #[error("no goals awaiting evaluation")]
    NoGoals,

    /// A requested goal id is not among the candidates.
    #[error("unknown goal: {0}")]
    UnknownGoal(String),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
