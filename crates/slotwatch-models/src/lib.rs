//! Core data models for slotwatch.
//!
//! This crate provides the value types shared by the remote client, the
//! polling runtime and the command line: goals, the opaque handles resolved
//! for them, time ranges and the slots discovered inside those ranges.

pub mod goal;
pub mod ids;
pub mod slot;

// Re-export main types
pub use goal::{Goal, GoalStatus, Identity};
pub use ids::{AnswerHandle, CourseId, GoalId, StudentId, TaskHandle, UserId};
pub use slot::{ClaimOutcome, RangeError, Slot, TimeRange};
