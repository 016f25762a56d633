//! State changes requested by a conversation turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{HistoryEntry, LeaveConflict, SessionContext, SessionLimits};
use crate::intent::Intent;
use crate::record::EmployeeProfile;
use crate::request::{LastRequest, PendingRequest};

/// One mutation of a [`SessionContext`].
///
/// A turn never touches the session directly; it returns a list of effects
/// that the store applies in order, under a single write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SessionEffect {
    RecordHistory {
        message: String,
        intent: Option<Intent>,
        at: DateTime<Utc>,
    },
    SetAwaitingEmail(bool),
    /// Counts a failed verification and locks the session at the cap.
    IncrementEmailAttempts,
    /// Binds a verified identity and resets the verification counters.
    BindEmployee(EmployeeProfile),
    /// Forgets the identity and asks for an email again.
    ClearEmployee,
    SetPending(PendingRequest),
    ClearPending,
    SaveLastRequest(LastRequest),
    SaveLeaveConflict(LeaveConflict),
    ClearLeaveConflict,
}

impl SessionContext {
    /// Applies one effect, enforcing `limits`.
    pub fn apply(&mut self, effect: SessionEffect, limits: &SessionLimits) {
        match effect {
            SessionEffect::RecordHistory {
                message,
                intent,
                at,
            } => {
                self.conversation_history.push_back(HistoryEntry {
                    timestamp: at,
                    message,
                    intent,
                });
                while self.conversation_history.len() > limits.max_history {
                    self.conversation_history.pop_front();
                }
            }
            SessionEffect::SetAwaitingEmail(awaiting) => self.awaiting_email = awaiting,
            SessionEffect::IncrementEmailAttempts => {
                self.email_attempts = self.email_attempts.saturating_add(1);
                if self.email_attempts >= limits.max_email_attempts {
                    self.email_verification_locked = true;
                    self.awaiting_email = false;
                }
            }
            SessionEffect::BindEmployee(profile) => {
                self.user_email = Some(profile.email);
                self.employee_id = Some(profile.id);
                self.employee_name = Some(profile.name);
                self.awaiting_email = false;
                self.email_attempts = 0;
                self.email_verification_locked = false;
            }
            SessionEffect::ClearEmployee => {
                self.user_email = None;
                self.employee_id = None;
                self.employee_name = None;
                self.awaiting_email = true;
                self.email_attempts = 0;
            }
            SessionEffect::SetPending(pending) => self.pending_confirmation = Some(pending),
            SessionEffect::ClearPending => self.pending_confirmation = None,
            SessionEffect::SaveLastRequest(last) => self.last_request = Some(last),
            SessionEffect::SaveLeaveConflict(conflict) => self.leave_conflict = Some(conflict),
            SessionEffect::ClearLeaveConflict => self.leave_conflict = None,
        }
    }

    pub fn apply_all(
        &mut self,
        effects: impl IntoIterator<Item = SessionEffect>,
        limits: &SessionLimits,
    ) {
        for effect in effects {
            self.apply(effect, limits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn history(at: DateTime<Utc>, message: &str) -> SessionEffect {
        SessionEffect::RecordHistory {
            message: message.to_string(),
            intent: None,
            at,
        }
    }

    #[test]
    fn history_keeps_most_recent() {
        let now = Utc::now();
        let limits = SessionLimits {
            max_history: 3,
            ..Default::default()
        };
        let mut session = SessionContext::new("s1", now);
        session.apply_all((0..5).map(|i| history(now, &format!("m{i}"))), &limits);

        let messages: Vec<_> = session
            .conversation_history
            .iter()
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(messages, ["m2", "m3", "m4"]);
        assert_eq!(session.recent_history(2).len(), 2);
        assert_eq!(session.recent_history(2)[1].message, "m4");
    }

    #[test]
    fn attempts_lock_at_cap() {
        let limits = SessionLimits::default();
        let mut session = SessionContext::new("s1", Utc::now());
        session.apply(SessionEffect::SetAwaitingEmail(true), &limits);
        session.apply(SessionEffect::IncrementEmailAttempts, &limits);
        session.apply(SessionEffect::IncrementEmailAttempts, &limits);
        assert!(!session.email_verification_locked);
        session.apply(SessionEffect::IncrementEmailAttempts, &limits);
        assert!(session.email_verification_locked);
        assert_eq!(session.email_attempts, 3);
    }

    #[test]
    fn bind_and_clear_identity() {
        let limits = SessionLimits::default();
        let mut session = SessionContext::new("s1", Utc::now());
        session.apply(SessionEffect::IncrementEmailAttempts, &limits);
        session.apply(
            SessionEffect::BindEmployee(EmployeeProfile {
                id: "EMP001".to_string(),
                name: "Asha Rao".to_string(),
                email: "asha.rao@winfomi.com".to_string(),
            }),
            &limits,
        );
        assert!(session.is_verified());
        assert_eq!(session.email_attempts, 0);
        assert_eq!(session.employee().map(|e| e.id), Some("EMP001".to_string()));

        session.apply(SessionEffect::ClearEmployee, &limits);
        assert!(session.employee().is_none());
        assert!(session.awaiting_email);
        assert!(!session.is_verified());
    }

    #[test]
    fn expiry_needs_history() {
        let now = Utc::now();
        let timeout = Duration::minutes(30);
        let limits = SessionLimits::default();
        let mut session = SessionContext::new("s1", now - Duration::hours(5));
        assert!(!session.is_expired(now, timeout));

        session.apply(history(now - Duration::minutes(31), "hi"), &limits);
        assert!(session.is_expired(now, timeout));

        session.apply(history(now - Duration::minutes(1), "again"), &limits);
        assert!(!session.is_expired(now, timeout));
    }
}
