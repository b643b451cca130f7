//! Async runtime for slotwatch.
//!
//! This crate watches evaluation slots for a set of goals and books the
//! earliest one it can get:
//! - `SlotDiscovery` - scans every configured time range concurrently
//! - `ClaimCommitter` - claims candidates one at a time, earliest first
//! - `PollWorker` - runs discovery and claiming on a fixed period for one goal
//! - `Orchestrator` - runs one worker per goal until cancelled
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use slotwatch_client::{GraphqlClient, SlotService, StaticToken};
//! use slotwatch_runtime::{collect_current_goals, awaiting_evaluation, Orchestrator, RuntimeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokens = Arc::new(StaticToken::from_env("SLOTWATCH_TOKEN")?);
//!     let service: Arc<dyn SlotService> = Arc::new(GraphqlClient::new(tokens)?);
//!
//!     let identity = service.resolve_identity("login").await?;
//!     let goals = awaiting_evaluation(collect_current_goals(service.as_ref(), &identity.user_id).await?);
//!
//!     let orchestrator = Orchestrator::new(service, identity, ranges, RuntimeConfig::default());
//!     let cancel = orchestrator.cancellation_token();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         cancel.cancel();
//!     });
//!
//!     orchestrator.run(goals).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Key Concepts
//!
//! ## Discovery
//!
//! Every range is scanned by its own task. The results are merged and
//! sorted only after all scanners finished. If any scanner failed the whole
//! batch fails with every error aggregated.
//!
//! ## Claiming
//!
//! Candidates are claimed strictly in ascending order. A lost race moves on
//! to the next candidate; the first success ends the attempt.
//!
//! ## Workers
//!
//! A worker resolves its goal's handles once. After a successful claim it
//! re-runs immediately, otherwise it waits for the next poll tick.

pub(crate) mod call;
pub mod committer;
pub mod config;
pub mod discovery;
pub mod error;
pub mod goals;
pub mod notify;
pub mod orchestrator;
pub mod worker;

#[cfg(test)]
mod mock;

pub use committer::ClaimCommitter;
pub use config::{RuntimeConfig, MIN_PERIOD};
pub use discovery::SlotDiscovery;
pub use error::{DiscoveryFailure, NotifyError, Result, RuntimeError, ScanError};
pub use goals::{awaiting_evaluation, collect_current_goals, find_goal};
pub use notify::{claim_message, dispatch, Notifier};
pub use orchestrator::Orchestrator;
pub use worker::{CycleOutcome, GoalHandles, PollWorker};
