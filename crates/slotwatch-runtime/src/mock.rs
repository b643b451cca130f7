//! Scriptable in-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use slotwatch_client::{ClientError, Result as ClientResult, SlotService};
use slotwatch_models::{
    AnswerHandle, CourseId, Goal, GoalId, Identity, Slot, StudentId, TaskHandle, TimeRange, UserId,
};

use crate::error::NotifyError;
use crate::notify::Notifier;

pub(crate) fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 20, h, m, 0).unwrap()
}

pub(crate) fn slot(h: u32, m: u32) -> Slot {
    Slot::new(at(h, m))
}

pub(crate) fn range(from: (u32, u32), to: (u32, u32)) -> TimeRange {
    TimeRange::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
}

/// What a scanner sees for a range, keyed by range start.
#[derive(Clone)]
pub(crate) enum ScanReply {
    Slots(Vec<Slot>),
    Fail(u16),
    Hang,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ResolveHandles(GoalId),
    ListSlots(DateTime<Utc>),
    Claim(Slot),
}

#[derive(Default)]
pub(crate) struct MockService {
    scans: Mutex<HashMap<DateTime<Utc>, ScanReply>>,
    claimable: Mutex<HashSet<Slot>>,
    broken_claims: Mutex<HashSet<Slot>>,
    goals: Mutex<Vec<Goal>>,
    course_goals: Mutex<HashMap<CourseId, Vec<Goal>>>,
    no_answer: Mutex<HashSet<GoalId>>,
    scan_delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<Call>>,
}

impl MockService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_range(self, range: TimeRange, reply: ScanReply) -> Self {
        self.scans.lock().unwrap().insert(range.start(), reply);
        self
    }

    /// The slot can be claimed exactly once.
    pub(crate) fn claimable(self, slot: Slot) -> Self {
        self.claimable.lock().unwrap().insert(slot);
        self
    }

    /// Claims on the slot fail with a non-conflict error.
    pub(crate) fn broken_claim(self, slot: Slot) -> Self {
        self.broken_claims.lock().unwrap().insert(slot);
        self
    }

    pub(crate) fn with_goals(self, goals: Vec<Goal>) -> Self {
        *self.goals.lock().unwrap() = goals;
        self
    }

    pub(crate) fn with_course(self, course: &str, goals: Vec<Goal>) -> Self {
        self.course_goals
            .lock()
            .unwrap()
            .insert(CourseId::from(course), goals);
        self
    }

    pub(crate) fn without_answer(self, goal: &str) -> Self {
        self.no_answer.lock().unwrap().insert(GoalId::from(goal));
        self
    }

    pub(crate) fn with_scan_delay(self, delay: Duration) -> Self {
        *self.scan_delay.lock().unwrap() = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn claims(&self) -> Vec<Slot> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Claim(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn scan_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListSlots(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SlotService for MockService {
    async fn resolve_identity(&self, _username: &str) -> ClientResult<Identity> {
        Ok(Identity::new("user-1", "student-1"))
    }

    async fn list_goals(&self, _user_id: &UserId) -> ClientResult<Vec<Goal>> {
        Ok(self.goals.lock().unwrap().clone())
    }

    async fn list_sub_goals(&self, course_id: &CourseId) -> ClientResult<Vec<Goal>> {
        self.course_goals
            .lock()
            .unwrap()
            .get(course_id)
            .cloned()
            .ok_or_else(|| ClientError::Remote(format!("unknown course {}", course_id)))
    }

    async fn resolve_handles(
        &self,
        goal_id: &GoalId,
        _student_id: &StudentId,
    ) -> ClientResult<(TaskHandle, AnswerHandle)> {
        self.record(Call::ResolveHandles(goal_id.clone()));
        if self.no_answer.lock().unwrap().contains(goal_id) {
            return Err(ClientError::NoAnswerAvailable(goal_id.to_string()));
        }
        Ok((
            TaskHandle::from(format!("task-{}", goal_id)),
            AnswerHandle::from(format!("answer-{}", goal_id)),
        ))
    }

    async fn list_slots(
        &self,
        _task: &TaskHandle,
        from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> ClientResult<Vec<Slot>> {
        self.record(Call::ListSlots(from));
        let delay = *self.scan_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .scans
            .lock()
            .unwrap()
            .get(&from)
            .cloned()
            .unwrap_or(ScanReply::Slots(Vec::new()));
        match reply {
            ScanReply::Slots(slots) => Ok(slots),
            ScanReply::Fail(code) => Err(ClientError::Status(code)),
            ScanReply::Hang => std::future::pending().await,
        }
    }

    async fn claim_slot(
        &self,
        _answer: &AnswerHandle,
        slot: Slot,
        _online: bool,
    ) -> ClientResult<String> {
        self.record(Call::Claim(slot));
        if self.broken_claims.lock().unwrap().contains(&slot) {
            return Err(ClientError::Status(503));
        }
        if self.claimable.lock().unwrap().remove(&slot) {
            Ok(format!("booking-{}", slot))
        } else {
            Err(ClientError::ClaimConflict("slot already taken".to_string()))
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) messages: Mutex<Vec<String>>,
    pub(crate) fail: bool,
    pub(crate) delay: Option<Duration>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(NotifyError::Delivery("chat unreachable".to_string()));
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
