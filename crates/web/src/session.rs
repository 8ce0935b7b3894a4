//! Per-browser task lists
//!
//! Each browser context is identified by a session cookie and owns its own
//! seeded [`TaskList`]. The store is bounded; when full, the least recently
//! used session is dropped to make room.

use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use tasklist_common::TaskList;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "tasklist_session";

struct Session {
    list: TaskList,
    last_used: u64,
}

/// In-memory session store
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    seed: Vec<String>,
    max_sessions: usize,
    /// Logical clock for LRU ordering
    tick: u64,
}

impl SessionStore {
    pub fn new(seed: Vec<String>, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            seed,
            max_sessions: max_sessions.max(1),
            tick: 0,
        }
    }

    /// Run `f` against the list of `requested`, creating a fresh seeded
    /// session when the id is absent or unknown.
    ///
    /// Returns the id of the session that was used alongside `f`'s result.
    pub fn with_list<R>(&mut self, requested: Option<Uuid>, f: impl FnOnce(&mut TaskList) -> R) -> (Uuid, R) {
        self.tick += 1;
        let tick = self.tick;

        let id = match requested {
            Some(id) if self.sessions.contains_key(&id) => id,
            _ => self.create(),
        };

        // create() always inserts, so the entry exists here
        let session = self
            .sessions
            .entry(id)
            .or_insert_with(|| Session {
                list: TaskList::new(),
                last_used: tick,
            });
        session.last_used = tick;
        (id, f(&mut session.list))
    }

    /// Whether `id` names a live session
    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn create(&mut self) -> Uuid {
        while self.sessions.len() >= self.max_sessions {
            self.evict_oldest();
        }

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                list: TaskList::seeded(self.seed.iter().cloned()),
                last_used: self.tick,
            },
        );
        debug!(session = %id, live = self.sessions.len(), "Session created");
        id
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, s)| s.last_used)
            .map(|(id, _)| *id);

        if let Some(id) = oldest {
            self.sessions.remove(&id);
            info!(session = %id, "Evicted least recently used session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Vec<String> {
        vec!["one".to_string(), "two".to_string()]
    }

    #[test]
    fn test_new_session_is_seeded() {
        let mut store = SessionStore::new(seed(), 4);
        let (_, count) = store.with_list(None, |list| list.count());
        assert_eq!(count, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_known_session_is_reused() {
        let mut store = SessionStore::new(seed(), 4);
        let (id, _) = store.with_list(None, |list| list.add_task("three"));
        let (again, count) = store.with_list(Some(id), |list| list.count());

        assert_eq!(id, again);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_unknown_session_gets_fresh_list() {
        let mut store = SessionStore::new(seed(), 4);
        let stale = Uuid::new_v4();
        let (id, count) = store.with_list(Some(stale), |list| list.count());

        assert_ne!(id, stale);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = SessionStore::new(seed(), 4);
        let (a, _) = store.with_list(None, |list| list.add_task("only in a"));
        let (b, count_b) = store.with_list(None, |list| list.count());

        assert_ne!(a, b);
        assert_eq!(count_b, 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut store = SessionStore::new(seed(), 2);
        let (a, _) = store.with_list(None, |_| ());
        let (b, _) = store.with_list(None, |_| ());
        // touch a so b becomes the oldest
        store.with_list(Some(a), |_| ());
        let (c, _) = store.with_list(None, |_| ());

        assert_eq!(store.len(), 2);
        assert!(store.contains(&a));
        assert!(!store.contains(&b));
        assert!(store.contains(&c));
    }
}
