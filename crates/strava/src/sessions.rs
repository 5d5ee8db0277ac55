use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use strava_core::flow::Session;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Shared handle to one browser's session; held for the length of a pass.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory map from browser session id to flow state.
///
/// Nothing is persisted; a restart forgets every session. Entries idle for
/// longer than the timeout are swept whenever a session is added.
pub struct SessionRegistry {
    inner: StdMutex<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            inner: StdMutex::default(),
            idle_timeout,
        }
    }

    /// Handle for a live session, refreshing its idle clock. Unknown and
    /// expired ids (e.g. a cookie that outlived a restart) yield `None`.
    pub fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let idle = sessions.get(&id)?.last_seen.elapsed();
        if idle >= self.idle_timeout {
            sessions.remove(&id);
            tracing::debug!(session = %id, "session expired");
            return None;
        }
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.handle.clone())
    }

    /// Register a session under a fresh id.
    pub fn insert(&self, session: Session) -> (Uuid, SessionHandle) {
        let mut sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.idle_timeout);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "swept idle sessions");
        }

        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!(session = %id, "created session");
        (id, handle)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
