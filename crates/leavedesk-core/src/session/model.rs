//! Per-conversation state.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::record::{EmployeeProfile, RequestRecord};
use crate::request::{LastRequest, PendingRequest};

/// Bounds applied whenever a session is mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionLimits {
    /// History ring buffer size.
    pub max_history: usize,
    /// Failed verifications before the session locks.
    pub max_email_attempts: u32,
    /// Inactivity window after which the sweep drops a session.
    pub timeout: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_history: 10,
            max_email_attempts: 3,
            timeout: Duration::minutes(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub intent: Option<Intent>,
}

/// Result of the last overlap check that blocked a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveConflict {
    pub existing: RequestRecord,
    pub requested: PendingRequest,
}

/// Everything remembered about one conversation.
///
/// Owned by a [`super::SessionStore`]; callers only ever see snapshots and
/// change it by submitting [`super::SessionEffect`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub session_id: String,
    pub user_email: Option<String>,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub awaiting_email: bool,
    pub email_attempts: u32,
    /// Terminal once set.
    pub email_verification_locked: bool,
    pub pending_confirmation: Option<PendingRequest>,
    pub last_request: Option<LastRequest>,
    pub leave_conflict: Option<LeaveConflict>,
    /// Most recent last.
    pub conversation_history: VecDeque<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            user_email: None,
            employee_id: None,
            employee_name: None,
            awaiting_email: false,
            email_attempts: 0,
            email_verification_locked: false,
            pending_confirmation: None,
            last_request: None,
            leave_conflict: None,
            conversation_history: VecDeque::new(),
            created_at: now,
        }
    }

    /// Verified identity, if any.
    pub fn employee(&self) -> Option<EmployeeProfile> {
        Some(EmployeeProfile {
            id: self.employee_id.clone()?,
            name: self.employee_name.clone()?,
            email: self.user_email.clone()?,
        })
    }

    pub fn is_verified(&self) -> bool {
        self.user_email.is_some() && !self.awaiting_email
    }

    /// Timestamp of the most recent history entry.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.conversation_history.back().map(|entry| entry.timestamp)
    }

    /// Sessions without any history never expire.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        self.last_activity()
            .is_some_and(|last| now.signed_duration_since(last) > timeout)
    }

    /// The last `count` history entries, oldest first.
    pub fn recent_history(&self, count: usize) -> Vec<HistoryEntry> {
        let skip = self.conversation_history.len().saturating_sub(count);
        self.conversation_history.iter().skip(skip).cloned().collect()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            has_email: self.user_email.is_some(),
            history_count: self.conversation_history.len(),
            has_last_request: self.last_request.is_some(),
            has_conflict: self.leave_conflict.is_some(),
            awaiting_confirmation: self.pending_confirmation.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub has_email: bool,
    pub history_count: usize,
    pub has_last_request: bool,
    pub has_conflict: bool,
    pub awaiting_confirmation: bool,
}
