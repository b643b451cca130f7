//! Per-goal poll worker.
//!
//! A worker resolves its goal's handles once, then loops forever:
//! discover slots, try to claim one, and either re-attempt right away (after
//! a claim) or wait for the next poll tick. A separate heartbeat timer logs
//! that the worker is alive until the worker exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use slotwatch_client::SlotService;
use slotwatch_models::{AnswerHandle, Goal, GoalId, Slot, StudentId, TaskHandle, TimeRange};

use crate::call::guarded;
use crate::committer::ClaimCommitter;
use crate::config::RuntimeConfig;
use crate::discovery::SlotDiscovery;
use crate::error::{Result, RuntimeError};
use crate::notify::{claim_message, dispatch, Notifier};

/// Handles resolved once per goal and kept for the worker's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalHandles {
    pub task: TaskHandle,
    pub answer: AnswerHandle,
}

/// Result of one discovery + claim cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Claimed(Slot),
    NothingClaimed,
}

/// Polls for and claims slots for a single goal.
pub struct PollWorker {
    goal: Goal,
    student_id: StudentId,
    service: Arc<dyn SlotService>,
    discovery: SlotDiscovery,
    committer: ClaimCommitter,
    ranges: Arc<[TimeRange]>,
    config: RuntimeConfig,
    notifier: Option<Arc<dyn Notifier>>,
    cancel: CancellationToken,
}

impl PollWorker {
    /// Creates a worker for `goal`.
    pub fn new(
        goal: Goal,
        student_id: StudentId,
        service: Arc<dyn SlotService>,
        ranges: Arc<[TimeRange]>,
        config: RuntimeConfig,
        cancel: CancellationToken,
    ) -> Self {
        let discovery = SlotDiscovery::new(Arc::clone(&service), config.request_timeout);
        let committer = ClaimCommitter::new(Arc::clone(&service), config.request_timeout);

        Self {
            goal,
            student_id,
            service,
            discovery,
            committer,
            ranges,
            config,
            notifier: None,
            cancel,
        }
    }

    /// Announce claimed slots through `notifier`.
    pub fn with_notifier(mut self, notifier: Option<Arc<dyn Notifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The goal this worker serves.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Run until cancelled.
    ///
    /// Returns an error only if the goal's handles cannot be resolved; that
    /// failure is not retried.
    pub async fn run(self) -> Result<()> {
        let goal_id = self.goal.id.clone();
        info!(goal_id = %goal_id, goal = %self.goal.name, "starting poll worker");

        let handles = match self.resolve().await {
            Some(Ok(handles)) => handles,
            Some(Err(e)) => {
                error!(goal_id = %goal_id, error = %e, "cannot resolve goal, worker exiting");
                return Err(e);
            }
            None => {
                debug!(goal_id = %goal_id, "cancelled before handles were resolved");
                return Ok(());
            }
        };

        debug!(
            goal_id = %goal_id,
            task = %handles.task,
            answer = %handles.answer,
            poll_interval_ms = self.config.poll_interval.as_millis(),
            "handles resolved, polling"
        );

        // Stops the heartbeat when this function returns.
        let heartbeat = self.cancel.child_token();
        let _heartbeat_guard = heartbeat.clone().drop_guard();
        tokio::spawn(heartbeat_loop(
            goal_id.clone(),
            self.config.heartbeat_period(),
            heartbeat,
        ));

        let mut ticker = interval(self.config.poll_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut rearm = false;

        loop {
            if rearm {
                rearm = false;
                if self.cancel.is_cancelled() {
                    break;
                }
            } else {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
            }

            match self.cycle(&handles).await {
                Ok(CycleOutcome::Claimed(slot)) => {
                    info!(goal_id = %goal_id, slot = %slot, "subscribed for the slot");
                    self.announce(slot);
                    rearm = true;
                }
                Ok(CycleOutcome::NothingClaimed) => {
                    trace!(goal_id = %goal_id, "nothing claimed this cycle");
                }
                Err(e) => {
                    warn!(goal_id = %goal_id, error = %e, "attempt failed");
                }
            }

            ticker.reset();
        }

        info!(goal_id = %goal_id, "poll worker stopped");
        Ok(())
    }

    /// Runs discovery over the worker's ranges, then tries to claim.
    pub async fn cycle(&self, handles: &GoalHandles) -> Result<CycleOutcome> {
        let slots = self
            .discovery
            .discover(&handles.task, &self.ranges, &self.cancel)
            .await?;

        if slots.is_empty() {
            return Ok(CycleOutcome::NothingClaimed);
        }

        info!(goal_id = %self.goal.id, slots = slots.len(), "found slots");

        let claimed = self
            .committer
            .commit(&handles.answer, &slots, self.config.online, &self.cancel)
            .await;

        Ok(claimed.map_or(CycleOutcome::NothingClaimed, CycleOutcome::Claimed))
    }

    /// Returns `None` if cancelled first.
    async fn resolve(&self) -> Option<Result<GoalHandles>> {
        let call = self
            .service
            .resolve_handles(&self.goal.id, &self.student_id);
        let result = guarded(&self.cancel, self.config.request_timeout, call).await?;

        Some(
            result
                .map(|(task, answer)| GoalHandles { task, answer })
                .map_err(|source| RuntimeError::Resolution {
                    goal_id: self.goal.id.clone(),
                    source,
                }),
        )
    }

    fn announce(&self, slot: Slot) {
        if let Some(notifier) = &self.notifier {
            dispatch(
                Arc::clone(notifier),
                claim_message(&slot),
                self.config.notify_timeout,
            );
        }
    }
}

async fn heartbeat_loop(goal_id: GoalId, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => info!(goal_id = %goal_id, "worker still alive"),
        }
    }
}
