//! Remote slot service interfaces for slotwatch.
//!
//! The polling runtime only ever talks to the remote system through the two
//! traits defined here:
//! - [`TokenProvider`] - hands out a credential before every remote call
//! - [`SlotService`] - the six logical operations of the remote service
//!
//! [`GraphqlClient`] is the concrete adapter speaking GraphQL over HTTPS.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use slotwatch_client::{GraphqlClient, SlotService, StaticToken};
//!
//! # async fn run() -> slotwatch_client::Result<()> {
//! let tokens = Arc::new(StaticToken::from_env("SLOTWATCH_TOKEN")?);
//! let client = GraphqlClient::new(tokens)?;
//!
//! let identity = client.resolve_identity("jdoe").await?;
//! let goals = client.list_goals(&identity.user_id).await?;
//! println!("{} goals", goals.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod graphql;
pub mod service;
pub mod token;

pub use error::{ClientError, Result};
pub use graphql::GraphqlClient;
pub use service::SlotService;
pub use token::{StaticToken, TokenProvider};
