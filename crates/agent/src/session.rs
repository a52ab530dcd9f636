//! Conversation sessions: short per-session history of exchanges.
//!
//! History is rendered as plain text for the system prompt rather than
//! replayed as structured turns.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// One question and the answer given to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

/// In-memory session store keeping the last `max_history` exchanges.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, VecDeque<Exchange>>>>,
    max_history: usize,
}

impl SessionStore {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_history,
        }
    }

    /// Start an empty session and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), VecDeque::new());
        debug!(session_id = %id, "Created session");
        id
    }

    /// Record an exchange, creating the session if it does not exist.
    pub async fn add_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut sessions = self.sessions.write().await;
        let exchanges = sessions.entry(session_id.to_string()).or_default();
        exchanges.push_back(Exchange {
            user: user.to_string(),
            assistant: assistant.to_string(),
        });
        while exchanges.len() > self.max_history {
            exchanges.pop_front();
        }
    }

    /// Rendered history, or `None` when the session has no exchanges.
    pub async fn history(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        let exchanges = sessions.get(session_id)?;
        if exchanges.is_empty() {
            return None;
        }

        let lines: Vec<String> = exchanges
            .iter()
            .map(|e| format!("User: {}\nAssistant: {}", e.user, e.assistant))
            .collect();
        Some(lines.join("\n"))
    }

    /// Forget a session's exchanges.
    pub async fn clear(&self, session_id: &str) {
        if let Some(exchanges) = self.sessions.write().await.get_mut(session_id) {
            exchanges.clear();
        }
    }

    pub async fn exchanges(&self, session_id: &str) -> Vec<Exchange> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(2)
    }
}
