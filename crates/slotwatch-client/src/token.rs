//! Credential providers.

use async_trait::async_trait;

use crate::error::{ClientError, Result};

/// Supplies a valid credential on demand.
///
/// Called before every remote operation; callers never cache the result.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token.
    async fn token(&self) -> Result<String>;
}

/// A fixed token handed over at startup.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Create a provider from a token string.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::Auth("token is empty".to_string()));
        }
        Ok(Self { token })
    }

    /// Create a provider from an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let token = std::env::var(var)
            .map_err(|_| ClientError::Auth(format!("missing {} environment variable", var)))?;
        Self::new(token)
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
