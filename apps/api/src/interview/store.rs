use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::interview::session::InterviewSession;

pub type SessionHandle = Arc<Mutex<InterviewSession>>;

/// In-process session map. Nothing is persisted; a restart forgets everything.
///
/// Each session sits behind its own mutex and handlers hold it for the whole
/// interaction, model call included, so one session's interactions run one
/// at a time.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: InterviewSession) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Returns whether a session was actually removed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new();
        let session = InterviewSession::new();
        let id = session.id;

        store.insert(session).await;
        assert_eq!(store.len().await, 1);

        let handle = store.get(id).await.expect("session present");
        assert_eq!(handle.lock().await.id, id);

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_sessions() {
        let store = SessionStore::new();
        let other = store.clone();
        let session = InterviewSession::new();
        let id = session.id;
        store.insert(session).await;
        assert!(other.get(id).await.is_some());
    }
}
