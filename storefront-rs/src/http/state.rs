use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use sqlx::SqlitePool;

/// Session token -> (user id, expires_at). Tokens expire after the
/// configured TTL; expired entries are dropped on lookup and by the
/// background pruner.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<DashMap<String, (String, Instant)>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: u64) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_hours * 3600),
        }
    }

    pub fn create(&self, user_id: String) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let expires = Instant::now() + self.ttl;
        self.inner.insert(token.clone(), (user_id, expires));
        token
    }

    pub fn get(&self, token: &str) -> Option<String> {
        let entry = self.inner.get(token)?;
        if entry.1 > Instant::now() {
            Some(entry.0.clone())
        } else {
            drop(entry);
            self.inner.remove(token);
            None
        }
    }

    pub fn remove(&self, token: &str) {
        self.inner.remove(token);
    }

    /// Drop all expired tokens, returning how many were removed.
    pub fn prune_expired(&self) -> usize {
        let before = self.inner.len();
        let now = Instant::now();
        self.inner.retain(|_, value| value.1 > now);
        before - self.inner.len()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: SessionStore,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::SessionStore;

    #[test]
    fn create_then_get_returns_user_id() {
        let store = SessionStore::new(24);
        let token = store.create(String::from("u1"));
        assert_eq!(store.get(&token), Some(String::from("u1")));
    }

    #[test]
    fn unknown_token_is_none() {
        let store = SessionStore::new(24);
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn zero_ttl_tokens_expire_immediately() {
        let store = SessionStore::new(0);
        let token = store.create(String::from("u1"));
        assert_eq!(store.get(&token), None);
    }

    #[test]
    fn remove_revokes_token() {
        let store = SessionStore::new(24);
        let token = store.create(String::from("u1"));
        store.remove(&token);
        assert_eq!(store.get(&token), None);
    }

    #[test]
    fn prune_drops_only_expired_tokens() {
        let expired = SessionStore::new(0);
        expired.create(String::from("u1"));
        expired.create(String::from("u2"));
        assert_eq!(expired.prune_expired(), 2);

        let live = SessionStore::new(24);
        live.create(String::from("u1"));
        assert_eq!(live.prune_expired(), 0);
    }
}
