//! services/api/src/adapters/user_file.rs
//!
//! The concrete implementation of the `UserRepository` port on top of a flat
//! `users.json` array. Every mutation is a full read-modify-write of the file,
//! serialized through one async mutex, and lands via write-then-rename so a
//! crash never leaves a half-written store behind.

use async_trait::async_trait;
use news_digest_core::domain::{ProfileUpdate, User};
use news_digest_core::ports::{PortError, PortResult, UserRepository};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::info;

pub struct JsonUserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Loads every user. A missing or blank file is an empty store.
    pub async fn list(&self) -> PortResult<Vec<User>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PortError::Unexpected(format!(
                    "Failed to read users {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            PortError::Unexpected(format!("Failed to parse users {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, users: &[User]) -> PortResult<()> {
        let json = serde_json::to_vec_pretty(users)
            .map_err(|e| PortError::Unexpected(format!("Failed to encode users: {}", e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let written = match tokio::fs::write(&tmp, &json).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        written.map_err(|e| {
            PortError::Unexpected(format!("Failed to save users {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl UserRepository for JsonUserStore {
    async fn find_by_email(&self, email: &str) -> PortResult<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.email == email))
    }

    async fn find_by_id(&self, id: &str) -> PortResult<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.id == id))
    }

    async fn insert(&self, user: User) -> PortResult<User> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.list().await?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(PortError::Conflict("User already exists".to_string()));
        }
        users.push(user.clone());
        self.save(&users).await?;
        info!("Stored new user {} ({} total)", user.id, users.len());
        Ok(user)
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> PortResult<User> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.list().await?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))?;
        update.apply_to(user);
        let updated = user.clone();
        self.save(&users).await?;
        Ok(updated)
    }
}
