//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::{InMemorySessionStore, JsonDigestStore, JsonUserStore};
use crate::config::Config;
use crate::error::ApiError;
use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use news_digest_core::ports::{DigestSource, SessionStore, UserRepository};
use std::sync::Arc;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub digests: Arc<dyn DigestSource>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
    /// Password hasher used for new hashes. Verification reads its
    /// parameters from the stored hash instead.
    pub hasher: Argon2<'static>,
    /// Checked in place of a stored hash when a login names an unknown
    /// email, so both kinds of failed login cost one verification.
    pub decoy_hash: String,
}

impl AppState {
    /// Wires the file-backed stores and an empty session table from `config`.
    pub fn from_config(config: Arc<Config>) -> Result<Self, ApiError> {
        let hasher = Argon2::default();
        Ok(Self {
            digests: Arc::new(JsonDigestStore::new(
                config.digest_path.clone(),
                config.status_path.clone(),
            )),
            users: Arc::new(JsonUserStore::new(config.users_path.clone())),
            sessions: Arc::new(InMemorySessionStore::new()),
            config,
            decoy_hash: decoy_hash(&hasher)?,
            hasher,
        })
    }
}

/// Hashes a random secret that is never stored or returned, so no password
/// verifies against the result.
pub fn decoy_hash(hasher: &Argon2<'_>) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher
        .hash_password(Uuid::new_v4().simple().to_string().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to build decoy hash: {}", e)))
}
