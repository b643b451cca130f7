//! Goal collection and filtering.

use tracing::debug;

use slotwatch_client::{Result as ClientResult, SlotService};
use slotwatch_models::{Goal, UserId};

/// Collects the user's current goals, expanding local courses into their
/// sub-goals.
///
/// Entries without a status or marked unavailable are dropped. Any listing
/// failure fails the whole collection.
pub async fn collect_current_goals(
    service: &dyn SlotService,
    user_id: &UserId,
) -> ClientResult<Vec<Goal>> {
    let mut result = Vec::new();

    for entry in service.list_goals(user_id).await? {
        let course = entry.course.clone();

        if entry.status.is_listable() && !entry.id.is_empty() {
            result.push(entry);
        }

        if let Some(course) = course {
            let sub_goals = service.list_sub_goals(&course).await?;
            debug!(course = %course, goals = sub_goals.len(), "expanded local course");
            result.extend(sub_goals.into_iter().filter(|g| g.status.is_listable()));
        }
    }

    Ok(result)
}

/// Keeps only the goals waiting for peer evaluation.
pub fn awaiting_evaluation(goals: Vec<Goal>) -> Vec<Goal> {
    goals
        .into_iter()
        .filter(|g| g.status.is_awaiting_evaluation())
        .collect()
}

/// Looks a goal up by id.
pub fn find_goal<'a>(goals: &'a [Goal], id: &str) -> Option<&'a Goal> {
    goals.iter().find(|g| g.id.as_str() == id)
}
