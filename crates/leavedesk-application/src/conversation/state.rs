use leavedesk_core::session::SessionContext;
use serde::{Deserialize, Serialize};

/// Where a conversation stands, derived from its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    /// Too many failed verifications. Terminal.
    Locked,
    /// No identity yet and no prompt sent.
    Unverified,
    /// Prompted for an email, waiting for one.
    AwaitingEmail,
    Idle,
    /// A request awaits yes / no / edit.
    PendingConfirmation,
}

impl ConversationState {
    pub fn of(session: &SessionContext) -> Self {
        if session.email_verification_locked {
            ConversationState::Locked
        } else if session.awaiting_email {
            ConversationState::AwaitingEmail
        } else if session.employee_id.is_none() {
            ConversationState::Unverified
        } else if session.pending_confirmation.is_some() {
            ConversationState::PendingConfirmation
        } else {
            ConversationState::Idle
        }
    }

    pub fn is_verified(self) -> bool {
        matches!(
            self,
            ConversationState::Idle | ConversationState::PendingConfirmation
        )
    }
}
