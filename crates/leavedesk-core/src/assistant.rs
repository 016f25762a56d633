//! Fallback for messages no structured intent recognises.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::HistoryEntry;

/// Answers free-text questions.
#[async_trait]
pub trait GeneralAssistant: Send + Sync {
    /// # Arguments
    ///
    /// * `message` - The employee's message
    /// * `history` - Recent turns, oldest first
    async fn answer(&self, message: &str, history: &[HistoryEntry]) -> Result<String>;
}
