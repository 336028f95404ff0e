use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::{Duration, Instant};

/// One live editor session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub last_seen: Instant,
}

/// Session registry: `session_id -> Session`.
///
/// The only authority on which sessions are live. Every operation takes the
/// same lock, so a removal can never be observed as present afterwards and a
/// `count()` reflects every `register` that returned before it.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // Critical sections never panic midway; a poisoned map is still consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or refresh a session. Idempotent.
    pub fn register(&self, id: &str) {
        let now = Instant::now();
        let total = {
            let mut map = self.lock();
            map.entry(id.to_owned())
                .and_modify(|s| s.last_seen = now)
                .or_insert_with(|| Session {
                    id: id.to_owned(),
                    last_seen: now,
                });
            map.len()
        };
        tracing::debug!(session_id = %id, total, "session registered");
    }

    /// Refresh `last_seen`. A touch racing a disconnect is a no-op.
    pub fn touch(&self, id: &str) -> bool {
        match self.lock().get_mut(id) {
            Some(s) => {
                s.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Remove a session if present.
    pub fn remove(&self, id: &str) -> bool {
        let (removed, total) = {
            let mut map = self.lock();
            let removed = map.remove(id).is_some();
            (removed, map.len())
        };
        if removed {
            tracing::debug!(session_id = %id, total, "session removed");
        }
        removed
    }

    /// Remove `id` only if it is still stale at `now`.
    pub fn remove_if_stale(&self, id: &str, now: Instant, timeout: Duration) -> bool {
        let mut map = self.lock();
        let stale = map
            .get(id)
            .is_some_and(|s| now.saturating_duration_since(s.last_seen) > timeout);
        if stale {
            map.remove(id);
        }
        stale
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Point-in-time copy of registered ids.
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.lock().keys().cloned().collect()
    }

    /// Point-in-time copy of `(id, last_seen)` pairs.
    pub fn last_seen(&self) -> Vec<(String, Instant)> {
        self.lock()
            .values()
            .map(|s| (s.id.clone(), s.last_seen))
            .collect()
    }
}
