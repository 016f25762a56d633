use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leavedesk_core::error::Result;
use leavedesk_core::session::{SessionContext, SessionEffect, SessionLimits, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`SessionStore`].
///
/// Every mutation clones the stored context, applies the effects and writes
/// the result back while holding the write lock.
pub struct SessionCache {
    /// Session contexts keyed by session ID
    sessions: Arc<RwLock<HashMap<String, SessionContext>>>,
    limits: SessionLimits,
}

impl SessionCache {
    /// Creates an empty cache enforcing `limits`.
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            limits,
        }
    }

    pub fn limits(&self) -> &SessionLimits {
        &self.limits
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every session.
    pub async fn clear(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.clear();
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(SessionLimits::default())
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn load(&self, session_id: &str, now: DateTime<Utc>) -> Result<SessionContext> {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            return Ok(session.clone());
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(%session_id, "creating session");
                SessionContext::new(session_id, now)
            })
            .clone();
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn apply(
        &self,
        session_id: &str,
        effects: Vec<SessionEffect>,
        now: DateTime<Utc>,
    ) -> Result<SessionContext> {
        let mut sessions = self.sessions.write().await;
        let mut updated = sessions
            .get(session_id)
            .cloned()
            .unwrap_or_else(|| SessionContext::new(session_id, now));
        updated.apply_all(effects, &self.limits);
        sessions.insert(session_id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.limits.timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, "swept expired sessions");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn history(message: &str, at: DateTime<Utc>) -> SessionEffect {
        SessionEffect::RecordHistory {
            message: message.to_string(),
            intent: None,
            at,
        }
    }

    #[tokio::test]
    async fn load_creates_lazily() {
        let cache = SessionCache::default();
        let now = Utc::now();
        assert!(cache.get("s1").await.unwrap().is_none());

        let session = cache.load("s1", now).await.unwrap();
        assert_eq!(session.session_id, "s1");
        assert_eq!(cache.len().await, 1);

        cache.load("s1", now).await.unwrap();
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn apply_replaces_whole_context() {
        let cache = SessionCache::default();
        let now = Utc::now();
        let updated = cache
            .apply(
                "s1",
                vec![history("hello", now), SessionEffect::SetAwaitingEmail(true)],
                now,
            )
            .await
            .unwrap();

        assert!(updated.awaiting_email);
        assert_eq!(updated.conversation_history.len(), 1);
        assert_eq!(cache.load("s1", now).await.unwrap(), updated);

        let stats = cache.stats("s1").await.unwrap().unwrap();
        assert_eq!(stats.history_count, 1);
        assert!(!stats.has_email);
    }

    #[tokio::test]
    async fn sweep_removes_only_idle_sessions_with_history() {
        let cache = SessionCache::default();
        let now = Utc::now();
        cache
            .apply("idle", vec![history("hi", now - Duration::minutes(45))], now)
            .await
            .unwrap();
        cache
            .apply("active", vec![history("hi", now - Duration::minutes(5))], now)
            .await
            .unwrap();
        cache.load("fresh", now).await.unwrap();

        assert_eq!(cache.sweep_expired(now).await.unwrap(), 1);
        assert!(cache.get("idle").await.unwrap().is_none());
        assert!(cache.get("active").await.unwrap().is_some());
        assert!(cache.get("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn new_sessions_are_stamped_with_the_given_time() {
        let cache = SessionCache::default();
        let then = Utc::now() - Duration::days(400);

        assert_eq!(cache.load("s1", then).await.unwrap().created_at, then);
        let applied = cache
            .apply("s2", vec![SessionEffect::SetAwaitingEmail(true)], then)
            .await
            .unwrap();
        assert_eq!(applied.created_at, then);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let cache = SessionCache::default();
        let now = Utc::now();
        cache.load("s1", now).await.unwrap();
        cache.delete("s1").await.unwrap();
        cache.delete("s1").await.unwrap();
        assert!(cache.is_empty().await);
    }
}
