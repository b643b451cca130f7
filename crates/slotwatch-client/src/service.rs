//! The remote slot service boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use slotwatch_models::{
    AnswerHandle, CourseId, Goal, GoalId, Identity, Slot, StudentId, TaskHandle, UserId,
};

use crate::error::Result;

/// The six logical operations the runtime needs from the remote system.
///
/// Implementations must be safe to share between concurrently running
/// range scanners and poll workers.
#[async_trait]
pub trait SlotService: Send + Sync {
    /// Resolve the account identifiers for a login.
    async fn resolve_identity(&self, username: &str) -> Result<Identity>;

    /// List the user's current goals.
    async fn list_goals(&self, user_id: &UserId) -> Result<Vec<Goal>>;

    /// List the goals of a local course.
    async fn list_sub_goals(&self, course_id: &CourseId) -> Result<Vec<Goal>>;

    /// Resolve the task and answer handles needed to query and claim slots
    /// for a goal.
    ///
    /// Fails with [`ClientError::NoAnswerAvailable`](crate::ClientError::NoAnswerAvailable)
    /// when the goal has no answer waiting for evaluation.
    async fn resolve_handles(
        &self,
        goal_id: &GoalId,
        student_id: &StudentId,
    ) -> Result<(TaskHandle, AnswerHandle)>;

    /// List open slot start times in `[from, to)`.
    ///
    /// An empty vector means nothing is open in the window; it is not an
    /// error.
    async fn list_slots(
        &self,
        task: &TaskHandle,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Slot>>;

    /// Attempt to book `slot` for `answer`, returning the booking id.
    async fn claim_slot(&self, answer: &AnswerHandle, slot: Slot, online: bool) -> Result<String>;
}
