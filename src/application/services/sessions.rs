use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use crate::domain::{PipelineError, Session, Turn};

/// Process-wide map of conversation sessions, keyed by session id.
///
/// Each session lives behind its own async mutex: concurrent `ask` calls on
/// the same session id serialize on it, while distinct sessions never block
/// one another. Sessions are created lazily and live for the process lifetime
/// unless removed explicitly.
pub struct SessionMemory {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    capacity: usize,
}

impl SessionMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    pub fn get_or_create(&self, session_id: &str) -> Result<Arc<Mutex<Session>>, PipelineError> {
        {
            let sessions = self
                .sessions
                .read()
                .map_err(|e| PipelineError::internal(e.to_string()))?;
            if let Some(session) = sessions.get(session_id) {
                return Ok(session.clone());
            }
        }

        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| PipelineError::internal(e.to_string()))?;
        Ok(sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(session_id, self.capacity))))
            .clone())
    }

    /// Oldest-first snapshot of a session's turns; empty for unknown ids.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Turn>, PipelineError> {
        let existing = {
            let sessions = self
                .sessions
                .read()
                .map_err(|e| PipelineError::internal(e.to_string()))?;
            sessions.get(session_id).cloned()
        };

        match existing {
            Some(session) => Ok(session.lock().await.history()),
            None => Ok(Vec::new()),
        }
    }

    pub async fn append(&self, session_id: &str, turn: Turn) -> Result<(), PipelineError> {
        let session = self.get_or_create(session_id)?;
        session.lock().await.push(turn);
        Ok(())
    }

    /// Explicit eviction hook; unknown ids are a no-op.
    pub fn remove(&self, session_id: &str) -> Result<(), PipelineError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| PipelineError::internal(e.to_string()))?;
        sessions.remove(session_id);
        Ok(())
    }
}
