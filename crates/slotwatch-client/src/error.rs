//! Error types for the remote client.

use thiserror::Error;

/// Errors that can occur while talking to the remote slot service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable credential could be obtained.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with an unexpected HTTP status.
    #[error("status code: {0}")]
    Status(u16),

    /// The service answered with GraphQL errors.
    #[error("platform returned error: ({0})")]
    Remote(String),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The goal has no answer waiting for evaluation.
    #[error("no evaluated answers found for goal {0}")]
    NoAnswerAvailable(String),

    /// Somebody else booked the slot first, or it is no longer bookable.
    #[error("slot claim rejected: {0}")]
    ClaimConflict(String),
}

impl ClientError {
    /// Returns true for a lost claim race.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::ClaimConflict(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
