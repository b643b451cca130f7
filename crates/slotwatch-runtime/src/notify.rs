//! Best-effort notifications about claimed slots.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use slotwatch_models::Slot;

use crate::error::NotifyError;

/// Delivers short text messages to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message.
    async fn send_message(&self, text: &str) -> Result<(), NotifyError>;
}

/// Text announcing a claimed slot.
pub fn claim_message(slot: &Slot) -> String {
    format!("slot occupied at {}", slot.local_display())
}

/// Sends `text` on a detached task bounded by `timeout`.
///
/// The outcome never reaches the caller: failures and timeouts are only
/// logged. The returned handle may be dropped.
pub fn dispatch(notifier: Arc<dyn Notifier>, text: String, timeout: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = match tokio::time::timeout(timeout, notifier.send_message(&text)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::TimedOut(timeout)),
        };

        match result {
            Ok(()) => debug!(message = %text, "notification sent"),
            Err(e) => warn!(error = %e, "failed to send notification"),
        }
    })
}
