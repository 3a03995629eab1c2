//! crates/news_digest_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, so the digest
//! file, the user file and the session table can be swapped for a database or
//! an external cache without touching the web layer.

use crate::domain::{Digest, ProfileUpdate, Session, User};
use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the storage backends.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Read-only access to the output of the digest pipeline.
#[async_trait]
pub trait DigestSource: Send + Sync {
    /// Loads the current digest. `Ok(None)` means no digest has been produced yet.
    async fn load_digest(&self) -> PortResult<Option<Digest>>;

    /// Loads the pipeline's own status document, if there is a readable one.
    async fn load_pipeline_status(&self) -> PortResult<Option<Value>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> PortResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> PortResult<Option<User>>;

    /// Stores a new user. Fails with `Conflict` when the email is taken.
    async fn insert(&self, user: User) -> PortResult<User>;

    /// Merges `update` into the stored user. Fails with `NotFound` when the id is unknown.
    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> PortResult<User>;
}

/// The process-wide token table.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> PortResult<()>;

    async fn get(&self, token: &str) -> PortResult<Option<Session>>;

    /// Removes a session, returning whether it existed.
    async fn remove(&self, token: &str) -> PortResult<bool>;
}
