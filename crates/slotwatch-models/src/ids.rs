//! Type-safe wrappers for the opaque identifiers handed out by the remote
//! service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate opaque ID newtypes with common functionality.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID from an existing string.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the remote service handed back an empty value.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a goal (a project the user wants reviewed).
    GoalId
);
define_id!(
    /// Identifier of a local course grouping several goals.
    CourseId
);
define_id!(
    /// Account-level user identifier.
    UserId
);
define_id!(
    /// Student profile identifier, used when resolving per-goal handles.
    StudentId
);
define_id!(
    /// Handle of the task whose review slots are listed.
    TaskHandle
);
define_id!(
    /// Handle of the submitted answer a claimed slot is booked for.
    AnswerHandle
);
