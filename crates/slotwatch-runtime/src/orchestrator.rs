//! Multi-goal orchestrator.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use slotwatch_client::SlotService;
use slotwatch_models::{Goal, GoalId, Identity, TimeRange};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::notify::Notifier;
use crate::worker::PollWorker;

/// Runs one poll worker per selected goal and waits for all of them.
pub struct Orchestrator {
    /// Remote service shared by every worker.
    service: Arc<dyn SlotService>,
    /// Account the workers act for.
    identity: Identity,
    /// Windows every worker searches.
    ranges: Arc<[TimeRange]>,
    /// Runtime configuration.
    config: RuntimeConfig,
    /// Optional claim notifications.
    notifier: Option<Arc<dyn Notifier>>,
    /// Shutdown signal shared with every worker.
    cancel: CancellationToken,
    /// Running workers.
    workers: JoinSet<(GoalId, Result<()>)>,
    /// Whether workers have been started.
    started: bool,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(
        service: Arc<dyn SlotService>,
        identity: Identity,
        ranges: Vec<TimeRange>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            service,
            identity,
            ranges: ranges.into(),
            config,
            notifier: None,
            cancel: CancellationToken::new(),
            workers: JoinSet::new(),
            started: false,
        }
    }

    /// Announce claims through `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops every worker when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Check if workers have been started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of workers not yet reaped by [`Orchestrator::wait`].
    pub fn running(&self) -> usize {
        self.workers.len()
    }

    /// Start one worker per goal.
    pub fn start(&mut self, goals: Vec<Goal>) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }
        if goals.is_empty() {
            return Err(RuntimeError::NoGoals);
        }

        info!(goals = goals.len(), ranges = self.ranges.len(), "starting workers");

        for goal in goals {
            let goal_id = goal.id.clone();
            let worker = PollWorker::new(
                goal,
                self.identity.student_id.clone(),
                Arc::clone(&self.service),
                Arc::clone(&self.ranges),
                self.config.clone(),
                self.cancel.clone(),
            )
            .with_notifier(self.notifier.clone());

            self.workers
                .spawn(async move { (goal_id, worker.run().await) });
        }

        self.started = true;

        Ok(())
    }

    /// Block until every worker has exited.
    ///
    /// Per-goal failures are logged, never returned.
    pub async fn wait(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok((goal_id, Ok(()))) => debug!(goal_id = %goal_id, "worker exited"),
                Ok((goal_id, Err(e))) => {
                    debug!(goal_id = %goal_id, error = %e, "worker exited with error")
                }
                Err(e) => {
                    let e = RuntimeError::WorkerPanicked(e.to_string());
                    error!(error = %e, "worker lost");
                }
            }
        }

        self.started = false;

        info!("all workers stopped");

        Ok(())
    }

    /// Cancel every worker and wait for them to exit.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down workers");
        self.cancel.cancel();
        self.wait().await
    }

    /// Start workers for `goals` and wait until they all exit.
    pub async fn run(mut self, goals: Vec<Goal>) -> Result<()> {
        self.start(goals)?;
        self.wait().await
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if self.started {
            self.cancel.cancel();
        }
    }
}
