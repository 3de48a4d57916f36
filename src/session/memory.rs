use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Session, SessionError, SessionStore};
use crate::utils;

/// Sessions held in memory, keyed by a random session id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, cookie_value: &str) -> Result<Option<Session>, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let now = utils::now_timestamp();

        match sessions.get(cookie_value) {
            Some(session) if session.is_expired_at(now) => {
                sessions.remove(cookie_value);
                Ok(None)
            }
            Some(session) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<String, SessionError> {
        let id = utils::generate_session_id();
        let now = utils::now_timestamp();

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, stored| !stored.is_expired_at(now));
        sessions.insert(id.clone(), session.clone());
        Ok(id)
    }
}
