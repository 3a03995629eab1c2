//! services/api/src/adapters/sessions.rs
//!
//! The in-memory implementation of the `SessionStore` port. Sessions live only
//! as long as the process; a restart logs everyone out.

use async_trait::async_trait;
use news_digest_core::domain::Session;
use news_digest_core::ports::{PortError, PortResult, SessionStore};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> PortError {
    PortError::Unexpected("Session table lock poisoned".to_string())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> PortResult<()> {
        self.sessions
            .write()
            .map_err(poisoned)?
            .insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(&self, token: &str) -> PortResult<Option<Session>> {
        Ok(self.sessions.read().map_err(poisoned)?.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> PortResult<bool> {
        Ok(self.sessions.write().map_err(poisoned)?.remove(token).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(token: &str, user_id: &str) -> Session {
        Session {
            token: token.to_string(),
            user_id: user_id.to_string(),
            email: "a@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn one_user_may_hold_several_sessions() {
        let store = InMemorySessionStore::new();
        store.insert(session("t1", "user_1")).await.unwrap();
        store.insert(session("t2", "user_1")).await.unwrap();
        assert_eq!(store.len(), 2);

        assert!(store.remove("t1").await.unwrap());
        assert!(store.get("t1").await.unwrap().is_none());
        assert_eq!(store.get("t2").await.unwrap().unwrap().user_id, "user_1");
    }

    #[tokio::test]
    async fn removing_twice_is_harmless() {
        let store = InMemorySessionStore::new();
        store.insert(session("t1", "user_1")).await.unwrap();
        assert!(store.remove("t1").await.unwrap());
        assert!(!store.remove("t1").await.unwrap());
        assert!(store.is_empty());
    }
}
