//! Serial claim committer.
//!
//! Claims are remote mutations, so candidates are tried one at a time in
//! ascending order and the first success wins.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use slotwatch_client::SlotService;
use slotwatch_models::{AnswerHandle, ClaimOutcome, Slot};

use crate::call::guarded;

/// Claims the earliest available slot out of a sorted candidate list.
#[derive(Clone)]
pub struct ClaimCommitter {
    service: Arc<dyn SlotService>,
    request_timeout: Duration,
}

impl ClaimCommitter {
    pub fn new(service: Arc<dyn SlotService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// Tries `candidates` strictly in order and stops at the first success.
    ///
    /// Returns `None` when no claim was made: the list was empty, every
    /// candidate was lost to another claimant, or `cancel` fired.
    pub async fn commit(
        &self,
        answer: &AnswerHandle,
        candidates: &[Slot],
        online: bool,
        cancel: &CancellationToken,
    ) -> Option<Slot> {
        for &slot in candidates {
            match self.attempt(answer, slot, online, cancel).await {
                None => return None,
                Some(outcome) if outcome.claimed => return Some(outcome.slot),
                Some(_) => continue,
            }
        }

        debug!(candidates = candidates.len(), "no claim made");
        None
    }

    /// Issues one claim request. Returns `None` if cancelled before it completed.
    pub async fn attempt(
        &self,
        answer: &AnswerHandle,
        slot: Slot,
        online: bool,
        cancel: &CancellationToken,
    ) -> Option<ClaimOutcome> {
        let call = self.service.claim_slot(answer, slot, online);
        match guarded(cancel, self.request_timeout, call).await? {
            Ok(booking) => {
                info!(slot = %slot, booking = %booking, "slot claimed");
                Some(ClaimOutcome::claimed(slot))
            }
            Err(e) if e.is_conflict() => {
                info!(slot = %slot, error = %e, "slot lost to another claimant");
                Some(ClaimOutcome::lost(slot))
            }
            Err(e) => {
                warn!(slot = %slot, error = %e, "claim failed");
                Some(ClaimOutcome::lost(slot))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{slot, MockService};

    fn committer(service: &Arc<MockService>) -> ClaimCommitter {
        let service: Arc<dyn SlotService> = service.clone();
        ClaimCommitter::new(service, Duration::from_secs(5))
    }

    fn answer() -> AnswerHandle {
        AnswerHandle::from("answer-1")
    }

    #[tokio::test]
    async fn test_first_success_stops_the_walk() {
        let (t1, t2, t3) = (slot(9, 45), slot(10, 15), slot(10, 30));
        let service = Arc::new(MockService::new().claimable(t2).claimable(t3));

        let claimed = committer(&service)
            .commit(&answer(), &[t1, t2, t3], true, &CancellationToken::new())
            .await;

        assert_eq!(claimed, Some(t2));
        assert_eq!(service.claims(), vec![t1, t2]);
    }

    #[tokio::test]
    async fn test_earliest_wins_when_all_available() {
        let (t1, t2) = (slot(9, 45), slot(10, 15));
        let service = Arc::new(MockService::new().claimable(t1).claimable(t2));

        let claimed = committer(&service)
            .commit(&answer(), &[t1, t2], true, &CancellationToken::new())
            .await;

        assert_eq!(claimed, Some(t1));
        assert_eq!(service.claims(), vec![t1]);
    }

    #[tokio::test]
    async fn test_empty_candidates_make_no_calls() {
        let service = Arc::new(MockService::new());

        let claimed = committer(&service)
            .commit(&answer(), &[], true, &CancellationToken::new())
            .await;

        assert_eq!(claimed, None);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_all_contested_is_no_claim() {
        let candidates = [slot(9, 45), slot(10, 15), slot(10, 15)];
        let service = Arc::new(MockService::new());

        let claimed = committer(&service)
            .commit(&answer(), &candidates, false, &CancellationToken::new())
            .await;

        assert_eq!(claimed, None);
        assert_eq!(service.claims(), candidates.to_vec());
    }

    #[tokio::test]
    async fn test_non_conflict_failure_moves_on() {
        let (t1, t2) = (slot(9, 45), slot(10, 15));
        let service = Arc::new(MockService::new().broken_claim(t1).claimable(t2));

        let claimed = committer(&service)
            .commit(&answer(), &[t1, t2], true, &CancellationToken::new())
            .await;

        assert_eq!(claimed, Some(t2));
    }

    #[tokio::test]
    async fn test_cancelled_commit_makes_no_calls() {
        let service = Arc::new(MockService::new().claimable(slot(9, 45)));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let claimed = committer(&service)
            .commit(&answer(), &[slot(9, 45)], true, &cancel)
            .await;

        assert_eq!(claimed, None);
        assert!(service.claims().is_empty());
    }

    #[tokio::test]
    async fn test_attempt_reports_outcome() {
        let service = Arc::new(MockService::new().claimable(slot(9, 45)));
        let committer = committer(&service);
        let cancel = CancellationToken::new();

        let first = committer.attempt(&answer(), slot(9, 45), true, &cancel).await;
        let second = committer.attempt(&answer(), slot(9, 45), true, &cancel).await;

        assert_eq!(first, Some(ClaimOutcome::claimed(slot(9, 45))));
        assert_eq!(second, Some(ClaimOutcome::lost(slot(9, 45))));
    }
}
