//! In-memory registry of live sessions for multi-client surfaces.
//!
//! Each session sits behind its own async mutex, so one session's operations
//! run strictly in order while different sessions proceed independently.
//! Sessions nobody has touched for a while are dropped by `sweep_idle`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use super::context::SessionContext;

/// Shared handle to one session.
pub type SharedSession = Arc<Mutex<SessionContext>>;

#[derive(Debug)]
struct StoredSession {
    session: SharedSession,
    /// Milliseconds since the store's epoch at the last lookup.
    last_used_ms: AtomicU64,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, StoredSession>,
    epoch: Instant,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
            epoch: Instant::now(),
        }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Register `context` and return its id.
    pub fn insert(&self, context: SessionContext) -> Uuid {
        let id = context.id();
        let stored = StoredSession {
            session: Arc::new(Mutex::new(context)),
            last_used_ms: AtomicU64::new(self.now_ms()),
        };
        self.sessions.insert(id, stored);
        tracing::debug!(session_id = %id, total = self.sessions.len(), "session created");
        id
    }

    /// Look up a session and mark it as used.
    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| {
            entry.last_used_ms.store(self.now_ms(), Ordering::Relaxed);
            Arc::clone(&entry.session)
        })
    }

    /// Drop a session. Returns false if it did not exist.
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "session removed");
        }
        removed
    }

    /// Drop sessions unused for longer than `max_idle`. Returns how many went.
    ///
    /// A session whose handle is still held by a request is kept.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = self.now_ms();
        let max_idle_ms = u64::try_from(max_idle.as_millis()).unwrap_or(u64::MAX);
        let before = self.sessions.len();
        self.sessions.retain(|_, stored| {
            let idle = now.saturating_sub(stored.last_used_ms.load(Ordering::Relaxed));
            idle <= max_idle_ms || Arc::strong_count(&stored.session) > 1
        });
        let swept = before.saturating_sub(self.sessions.len());
        if swept > 0 {
            tracing::info!(swept, remaining = self.sessions.len(), "idle sessions expired");
        }
        swept
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
