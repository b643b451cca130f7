//! Bounded, cancellable remote calls.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use slotwatch_client::{ClientError, Result as ClientResult};

/// Runs a remote call under a deadline, abandoning it on cancellation.
///
/// Returns `None` if the token fired first. A call that outlives `limit` is
/// reported as a transport failure.
pub(crate) async fn guarded<T, F>(
    cancel: &CancellationToken,
    limit: Duration,
    call: F,
) -> Option<ClientResult<T>>
where
    F: Future<Output = ClientResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = tokio::time::timeout(limit, call) => Some(result.unwrap_or_else(|_| {
            Err(ClientError::Transport(format!("timed out after {:?}", limit)))
        })),
    }
}
