//! services/api/src/web/session.rs
//!
//! In-memory login sessions.
//!
//! The cookie value is `<session id>.<signature>`, where the signature is a
//! SHA-256 over the configured secret and the id. Session state never leaves
//! the process; a restart logs everyone out.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use karma_core::ConversationHistory;
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

/// Everything a logged-in browser session owns.
#[derive(Debug)]
pub struct SessionData {
    pub user_name: String,
    pub history: ConversationHistory,
}

/// Shared, lockable handle to one session. Requests from the same session
/// take turns on this lock, so history updates are never lost.
pub type SessionHandle = Arc<Mutex<SessionData>>;

/// The session attached to the current request by `require_session`.
#[derive(Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub handle: SessionHandle,
}

pub struct SessionStore {
    secret: String,
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a session and returns the signed cookie value for it.
    ///
    /// There is a single account, so a login replaces whatever sessions were
    /// live before it along with their conversations.
    pub async fn create(&self, user_name: impl Into<String>) -> String {
        let id = Uuid::new_v4();
        let data = SessionData {
            user_name: user_name.into(),
            history: ConversationHistory::new(),
        };
        let mut sessions = self.sessions.write().await;
        if !sessions.is_empty() {
            debug!(dropped = sessions.len(), "Replacing previous sessions");
            sessions.clear();
        }
        sessions.insert(id, Arc::new(Mutex::new(data)));
        format!("{}.{}", id, self.sign(&id))
    }

    /// Number of sessions currently held in memory.
    pub async fn live_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Looks up the session behind a cookie value. Tampered or unknown values
    /// resolve to `None`.
    pub async fn resolve(&self, cookie_value: &str) -> Option<CurrentSession> {
        let (id, signature) = cookie_value.split_once('.')?;
        let id = Uuid::parse_str(id).ok()?;
        if self.sign(&id) != signature {
            return None;
        }
        let handle = self.sessions.read().await.get(&id)?.clone();
        Some(CurrentSession { id, handle })
    }

    pub async fn remove(&self, id: Uuid) {
        self.sessions.write().await.remove(&id);
    }

    fn sign(&self, id: &Uuid) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(id.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Pulls the session cookie value out of the request headers.
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
}

pub fn set_cookie_header(value: &str) -> String {
    format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/")
}

pub fn clear_cookie_header() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}
