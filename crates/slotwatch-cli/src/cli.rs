//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// slotwatch - books peer evaluation slots as soon as they open up
#[derive(Parser, Debug)]
#[command(name = "slotwatch")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Platform login
    #[arg(short, long, env = "SLOTWATCH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Platform access token
    #[arg(short, long, env = "SLOTWATCH_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Campus id sent with every request
    #[arg(long, env = "SLOTWATCH_SCHOOL_ID", global = true)]
    pub school: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Watch goals and claim the earliest free slot (default)
    Run {
        /// Goal id to watch (repeatable)
        #[arg(short, long = "goal")]
        goals: Vec<String>,

        /// Watch every goal awaiting evaluation
        #[arg(short, long, conflicts_with = "goals")]
        all: bool,
    },

    /// List goals awaiting evaluation
    Goals,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            goals: Vec::new(),
            all: false,
        }
    }
}

impl Cli {
    /// Returns the config file path.
    ///
    /// `--config` wins, then `$SLOTWATCH_CONFIG_DIR/config.yaml`, then
    /// `~/.slotwatch/config.yaml`.
    pub fn config_path(&self) -> PathBuf {
        if let Some(path) = &self.config {
            return PathBuf::from(shellexpand::tilde(path).into_owned());
        }

        config_dir().join(CONFIG_FILE)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// Directory holding the configuration.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SLOTWATCH_CONFIG_DIR") {
        return PathBuf::from(shellexpand::tilde(&dir).into_owned());
    }

    dirs::home_dir()
        .map(|h| h.join(".slotwatch"))
        .unwrap_or_else(|| PathBuf::from(".slotwatch"))
}
