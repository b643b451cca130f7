//! Error types for the runtime crate.

use std::fmt;

use slotwatch_client::ClientError;
use slotwatch_models::{GoalId, TimeRange};
use thiserror::Error;

/// Errors that can occur in the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Task or answer handles could not be resolved for a goal.
    #[error("resolve handles for goal {goal_id}: {source}")]
    Resolution {
        goal_id: GoalId,
        #[source]
        source: ClientError,
    },

    /// One or more range scanners failed.
    #[error("collect slots: {0}")]
    Discovery(#[from] DiscoveryFailure),

    /// Runtime not started.
    #[error("runtime not started")]
    NotStarted,

    /// Runtime already started.
    #[error("runtime already started")]
    AlreadyStarted,

    /// Nothing to run.
    #[error("no goals selected")]
    NoGoals,

    /// A worker task panicked.
    #[error("worker task panicked: {0}")]
    WorkerPanicked(String),
}

/// Failure of a single range scanner.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The remote call failed.
    #[error("get slots in {range}: {source}")]
    Client {
        range: TimeRange,
        #[source]
        source: ClientError,
    },

    /// The scanner task died.
    #[error("range scanner panicked: {0}")]
    Panicked(String),
}

/// Every scanner error recorded during one discovery call.
#[derive(Debug)]
pub struct DiscoveryFailure {
    errors: Vec<ScanError>,
}

impl DiscoveryFailure {
    pub fn new(errors: Vec<ScanError>) -> Self {
        Self { errors }
    }

    /// The individual scanner errors, in completion order.
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }
}

impl fmt::Display for DiscoveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for DiscoveryFailure {}

/// Errors raised by notifier adapters.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The transport rejected or failed the message.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// Delivery did not finish in time.
    #[error("delivery timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
