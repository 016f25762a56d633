//! Session store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::effect::SessionEffect;
use super::model::{SessionContext, SessionStats};
use crate::error::Result;

/// Owner of every [`SessionContext`].
///
/// # Implementation Notes
///
/// `apply` must replace the whole context inside one write section so that
/// concurrent turns never observe half-applied effects.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns a snapshot of the session, creating it on first sight.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Session to read
    /// * `now` - Creation time if the session is new
    async fn load(&self, session_id: &str, now: DateTime<Utc>) -> Result<SessionContext>;

    /// Snapshot without creating.
    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>>;

    /// Applies `effects` in order and returns the updated snapshot.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Session to mutate; created if unseen
    /// * `effects` - Mutations produced by a conversation turn
    /// * `now` - Creation time if the session is new
    async fn apply(
        &self,
        session_id: &str,
        effects: Vec<SessionEffect>,
        now: DateTime<Utc>,
    ) -> Result<SessionContext>;

    /// Drops the session. Unknown ids are not an error.
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Removes sessions idle past the timeout.
    ///
    /// # Returns
    ///
    /// The number of sessions removed.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize>;

    async fn stats(&self, session_id: &str) -> Result<Option<SessionStats>> {
        Ok(self.get(session_id).await?.map(|session| session.stats()))
    }
}
