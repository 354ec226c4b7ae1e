use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Server-side session state established at login. `is_admin` is derived
/// from the raw username the client submitted, never from the row the
/// (injectable) credential query matched.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: Uuid,
    pub username: String,
    pub original_username: String,
    pub is_admin: bool,
    pub user_id: i32,
}

struct Entry {
    session: Session,
    expires_at: OffsetDateTime,
}

/// In-memory session store keyed by the opaque cookie identifier, with a
/// sliding TTL. Expired entries are dropped lazily on lookup.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&self, session: Session) {
        let mut map = self.inner.lock().expect("session store poisoned");
        map.insert(
            session.session_id,
            Entry {
                session,
                expires_at: OffsetDateTime::now_utc() + self.ttl,
            },
        );
    }

    /// Looks up a live session and slides its expiry forward.
    pub fn get(&self, id: Uuid) -> Option<Session> {
        let mut map = self.inner.lock().expect("session store poisoned");
        let now = OffsetDateTime::now_utc();
        if let Some(entry) = map.get_mut(&id) {
            if entry.expires_at > now {
                entry.expires_at = now + self.ttl;
                return Some(entry.session.clone());
            }
        }
        map.remove(&id);
        None
    }

    pub fn remove(&self, id: Uuid) {
        let mut map = self.inner.lock().expect("session store poisoned");
        map.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("session store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: Uuid) -> Session {
        Session {
            session_id: id,
            username: "admin".into(),
            original_username: "admin".into(),
            is_admin: true,
            user_id: 1,
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let store = SessionStore::new(Duration::hours(24));
        let id = Uuid::new_v4();
        store.insert(sample(id));
        let got = store.get(id).expect("session should be live");
        assert_eq!(got.username, "admin");
        assert!(got.is_admin);
    }

    #[test]
    fn expired_session_is_dropped_on_lookup() {
        let store = SessionStore::new(Duration::seconds(-1));
        let id = Uuid::new_v4();
        store.insert(sample(id));
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let store = SessionStore::new(Duration::hours(24));
        let id = Uuid::new_v4();
        store.insert(sample(id));
        store.remove(id);
        store.remove(id);
        assert!(store.get(id).is_none());
    }

    #[test]
    fn unknown_id_misses() {
        let store = SessionStore::new(Duration::hours(24));
        assert!(store.get(Uuid::new_v4()).is_none());
    }
}
