//! slotwatch CLI library.
//!
//! Command-line parsing, configuration loading and goal selection for the
//! `slotwatch` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod select;

pub use error::{CliError, Result};
