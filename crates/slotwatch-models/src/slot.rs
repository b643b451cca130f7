//! Time ranges and the slots discovered inside them.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Format used when showing instants to people.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised when building a [`TimeRange`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The range does not span any time.
    #[error("range start {start} is not before end {end}")]
    NotIncreasing {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A window of time to search for slots in.
///
/// Invariant: `start < end`. Fields are private so the invariant cannot be
/// broken after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a new range, rejecting empty or reversed windows.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if start >= end {
            return Err(RangeError::NotIncreasing { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.with_timezone(&Local).format(DISPLAY_FORMAT),
            self.end.with_timezone(&Local).format(DISPLAY_FORMAT)
        )
    }
}

/// A single claimable start instant.
///
/// Slots have no identity beyond their instant: equal instants are
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(DateTime<Utc>);

impl Slot {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(start)
    }

    /// The start instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.0
    }

    /// The start instant rendered in local time.
    pub fn local_display(&self) -> String {
        self.0.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
    }
}

impl From<DateTime<Utc>> for Slot {
    fn from(start: DateTime<Utc>) -> Self {
        Self(start)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Result of a single claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub slot: Slot,
    pub claimed: bool,
}

impl ClaimOutcome {
    pub fn claimed(slot: Slot) -> Self {
        Self {
            slot,
            claimed: true,
        }
    }

    pub fn lost(slot: Slot) -> Self {
        Self {
            slot,
            claimed: false,
        }
    }
}
