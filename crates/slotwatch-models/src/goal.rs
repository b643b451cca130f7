//! Goal types for slotwatch.
//!
//! A goal is one reviewable unit of work. Goals are fetched once at startup,
//! filtered down to the ones awaiting evaluation and then handed to the poll
//! workers; they are never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ids::{CourseId, GoalId, StudentId, UserId};

/// Lifecycle status of a goal as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum GoalStatus {
    /// The remote service did not report a status.
    #[default]
    Unknown,
    Completed,
    Unavailable,
    InProgress,
    ReadyToStart,
    RegistrationIsOpen,
    /// The goal is waiting for peer evaluations; only these goals need slots.
    P2pEvaluations,
    /// Any status this version does not know about.
    Other(String),
}

impl GoalStatus {
    /// Returns the wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            GoalStatus::Unknown => "",
            GoalStatus::Completed => "COMPLETED",
            GoalStatus::Unavailable => "UNAVAILABLE",
            GoalStatus::InProgress => "IN_PROGRESS",
            GoalStatus::ReadyToStart => "READY_TO_START",
            GoalStatus::RegistrationIsOpen => "REGISTRATION_IS_OPEN",
            GoalStatus::P2pEvaluations => "P2P_EVALUATIONS",
            GoalStatus::Other(s) => s,
        }
    }

    /// Returns true if the goal is awaiting evaluation.
    pub fn is_awaiting_evaluation(&self) -> bool {
        matches!(self, GoalStatus::P2pEvaluations)
    }

    /// Returns true if the goal can be listed at all.
    pub fn is_listable(&self) -> bool {
        !matches!(self, GoalStatus::Unknown | GoalStatus::Unavailable)
    }
}

impl From<String> for GoalStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => GoalStatus::Unknown,
            "COMPLETED" => GoalStatus::Completed,
            "UNAVAILABLE" => GoalStatus::Unavailable,
            "IN_PROGRESS" => GoalStatus::InProgress,
            "READY_TO_START" => GoalStatus::ReadyToStart,
            "REGISTRATION_IS_OPEN" => GoalStatus::RegistrationIsOpen,
            "P2P_EVALUATIONS" => GoalStatus::P2pEvaluations,
            _ => GoalStatus::Other(s),
        }
    }
}

impl From<&str> for GoalStatus {
    fn from(s: &str) -> Self {
        GoalStatus::from(s.to_string())
    }
}

impl From<GoalStatus> for String {
    fn from(status: GoalStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Unknown => write!(f, "UNKNOWN"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// A reviewable unit of work.
///
/// Identity is the `id`: two goals with the same id compare equal regardless
/// of name or status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Opaque goal identifier.
    pub id: GoalId,

    /// Human readable goal name.
    #[serde(default)]
    pub name: String,

    /// Current status.
    #[serde(default)]
    pub status: GoalStatus,

    /// Local course this entry opens up, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseId>,
}

impl Goal {
    /// Creates a new goal.
    pub fn new(id: impl Into<GoalId>, name: impl Into<String>, status: GoalStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            course: None,
        }
    }

    /// Sets the local course this entry belongs to.
    pub fn with_course(mut self, course: impl Into<CourseId>) -> Self {
        self.course = Some(course.into());
        self
    }
}

impl PartialEq for Goal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Goal {}

impl Hash for Goal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>7} - {:>25} - {}", self.id, self.name, self.status)
    }
}

/// The identifiers of the logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub student_id: StudentId,
}

impl Identity {
    pub fn new(user_id: impl Into<UserId>, student_id: impl Into<StudentId>) -> Self {
        Self {
            user_id: user_id.into(),
            student_id: student_id.into(),
        }
    }
}
