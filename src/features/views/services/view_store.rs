use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::features::views::models::ViewSession;

/// Bounded in-memory registry of view sessions.
///
/// Sessions idle longer than `idle_ttl` are dropped by `sweep_expired`;
/// inserting into a full store evicts the least recently used session.
pub struct ViewStore {
    sessions: RwLock<HashMap<Uuid, ViewSession>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl std::fmt::Debug for ViewStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStore")
            .field("idle_ttl", &self.idle_ttl)
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}

impl ViewStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub async fn insert(&self, session: ViewSession) {
        let mut sessions = self.sessions.write().await;
        Self::drop_expired(&mut sessions, self.idle_ttl, Instant::now());

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.last_seen)
                .map(|s| s.id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::debug!("Evicted least recently used view session {}", id);
                }
                None => break,
            }
        }

        sessions.insert(session.id, session);
    }

    /// Run `f` against a live session and mark it as used.
    ///
    /// Returns `None` for unknown or expired sessions.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ViewSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();

        let expired = sessions
            .get(&id)
            .is_some_and(|s| now.saturating_duration_since(s.last_seen) > self.idle_ttl);
        if expired {
            sessions.remove(&id);
            return None;
        }

        let session = sessions.get_mut(&id)?;
        session.touch();
        Some(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop idle sessions, returning how many were removed
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        Self::drop_expired(&mut sessions, self.idle_ttl, Instant::now())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn drop_expired(
        sessions: &mut HashMap<Uuid, ViewSession>,
        idle_ttl: Duration,
        now: Instant,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| now.saturating_duration_since(s.last_seen) <= idle_ttl);
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::views::models::ViewKind;

    fn aged(kind: ViewKind, age: Duration) -> ViewSession {
        let mut session = ViewSession::new(kind);
        session.last_seen = Instant::now()
            .checked_sub(age)
            .expect("clock too close to boot for test");
        session
    }

    #[tokio::test]
    async fn test_with_session_touches() {
        let store = ViewStore::new(Duration::from_secs(60), 10);
        let session = aged(ViewKind::SkillMap, Duration::from_secs(30));
        let id = session.id;
        let before = session.last_seen;
        store.insert(session).await;

        let seen = store.with_session(id, |s| s.last_seen).await.unwrap();
        assert!(seen > before);
        assert_eq!(store.with_session(Uuid::new_v4(), |_| ()).await, None);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_gone() {
        let store = ViewStore::new(Duration::from_secs(60), 10);
        let stale = aged(ViewKind::Products, Duration::from_secs(120));
        let stale_id = stale.id;
        store.insert(ViewSession::new(ViewKind::SkillMap)).await;
        // inserted directly so the insert-time sweep does not see it first
        store.sessions.write().await.insert(stale_id, stale);

        assert_eq!(store.with_session(stale_id, |_| ()).await, None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sweep_counts_removed() {
        let store = ViewStore::new(Duration::from_secs(60), 10);
        {
            let mut sessions = store.sessions.write().await;
            for _ in 0..3 {
                let s = aged(ViewKind::SkillMap, Duration::from_secs(300));
                sessions.insert(s.id, s);
            }
        }
        store.insert(ViewSession::new(ViewKind::Products)).await;
        assert_eq!(store.len().await, 1);

        let s = aged(ViewKind::SkillMap, Duration::from_secs(300));
        store.sessions.write().await.insert(s.id, s);
        assert_eq!(store.sweep_expired().await, 1);
    }

    #[tokio::test]
    async fn test_full_store_evicts_least_recently_used() {
        let store = ViewStore::new(Duration::from_secs(600), 2);
        let oldest = aged(ViewKind::SkillMap, Duration::from_secs(50));
        let middle = aged(ViewKind::SkillMap, Duration::from_secs(20));
        let (oldest_id, middle_id) = (oldest.id, middle.id);
        store.insert(oldest).await;
        store.insert(middle).await;

        let newest = ViewSession::new(ViewKind::Products);
        let newest_id = newest.id;
        store.insert(newest).await;

        assert_eq!(store.len().await, 2);
        assert!(store.with_session(oldest_id, |_| ()).await.is_none());
        assert!(store.with_session(middle_id, |_| ()).await.is_some());
        assert!(store.with_session(newest_id, |_| ()).await.is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = ViewStore::new(Duration::from_secs(60), 10);
        let session = ViewSession::new(ViewKind::SkillMap);
        let id = session.id;
        store.insert(session).await;

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
    }
}
