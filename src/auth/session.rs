//! Server-side session storage.
//!
//! A session is created for every browser that reaches the session layer
//! and carries at most one piece of state: the `post_no` it logged in with.
//! Sessions live in process memory and are lost on restart.

use std::collections::HashMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::SqlValue;

/// Default session lifetime (1 hour).
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 60 * 60;

/// Expiry time `max_age` after `now`, saturating at the latest representable time.
fn expiry_after(now: DateTime<Utc>, max_age: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(max_age)
        .ok()
        .and_then(|age| now.checked_add_signed(age))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A browser session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque session identifier (UUID v4).
    pub id: String,
    /// Student number this session is logged in as, kept as it was sent.
    pub post_no: Option<SqlValue>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create an anonymous session that lives for `max_age`.
    pub fn new(max_age: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            post_no: None,
            created_at: now,
            expires_at: expiry_after(now, max_age),
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if a student number is attached.
    pub fn is_logged_in(&self) -> bool {
        self.post_no.is_some()
    }

    /// Get the remaining time until expiration.
    pub fn remaining_time(&self) -> Option<chrono::Duration> {
        let remaining = self.expires_at - Utc::now();
        if remaining > chrono::Duration::zero() {
            Some(remaining)
        } else {
            None
        }
    }
}

/// Storage backend for sessions.
///
/// Implementations must treat expired sessions as absent.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Create and store a new anonymous session.
    fn create(&self) -> Session;

    /// Load a live session by id.
    fn load(&self, id: &str) -> Option<Session>;

    /// Attach or clear the logged-in student number.
    ///
    /// Returns false if the session does not exist or has expired.
    fn set_post_no(&self, id: &str, post_no: Option<SqlValue>) -> bool;

    /// Extend a live session by the store's max age.
    fn refresh(&self, id: &str) -> Option<Session>;

    /// Remove a session. Returns true if one was removed.
    fn remove(&self, id: &str) -> bool;

    /// Evict expired sessions, returning how many were removed.
    fn cleanup_expired(&self) -> usize;

    /// Number of stored sessions, expired ones included until cleanup.
    fn len(&self) -> usize;

    /// Check if no sessions are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lifetime given to new and refreshed sessions.
    fn max_age(&self) -> Duration;
}

/// In-memory session store.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    max_age: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    /// Create a store with the default max age.
    pub fn new() -> Self {
        Self::with_max_age(Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECS))
    }

    /// Create a store with a custom max age.
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_age,
        }
    }

    // A panic while holding the lock cannot leave a half-written Session,
    // so poisoned guards are safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySessionStore")
            .field("sessions", &self.len())
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self) -> Session {
        let session = Session::new(self.max_age);
        self.write().insert(session.id.clone(), session.clone());
        debug!(session_id = %session.id, "Session created");
        session
    }

    fn load(&self, id: &str) -> Option<Session> {
        {
            let sessions = self.read();
            match sessions.get(id) {
                None => return None,
                Some(session) if !session.is_expired() => return Some(session.clone()),
                Some(_) => {}
            }
        }

        // Expired: drop it now rather than waiting for cleanup
        self.write().remove(id);
        debug!(session_id = %id, "Session expired");
        None
    }

    fn set_post_no(&self, id: &str, post_no: Option<SqlValue>) -> bool {
        let mut sessions = self.write();
        match sessions.get_mut(id) {
            Some(session) if !session.is_expired() => {
                session.post_no = post_no;
                true
            }
            Some(_) => {
                sessions.remove(id);
                false
            }
            None => false,
        }
    }

    fn refresh(&self, id: &str) -> Option<Session> {
        let mut sessions = self.write();
        let session = sessions.get_mut(id).filter(|s| !s.is_expired())?;
        session.expires_at = expiry_after(Utc::now(), self.max_age);
        Some(session.clone())
    }

    fn remove(&self, id: &str) -> bool {
        self.write().remove(id).is_some()
    }

    fn cleanup_expired(&self) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());

        let removed = before - sessions.len();
        if removed > 0 {
            info!(removed = removed, "Cleaned up expired sessions");
        }
        removed
    }

    fn len(&self) -> usize {
        self.read().len()
    }

    fn max_age(&self) -> Duration {
        self.max_age
    }
}
