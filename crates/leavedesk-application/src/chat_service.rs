//! Chat turn use case.
//!
//! `ChatService` ties the [`ConversationMachine`] to a [`SessionStore`]:
//! sweep expired sessions, load a snapshot, compute the turn, apply its
//! effects in one write.

use std::sync::Arc;

use leavedesk_core::chat::{ChatRequest, ChatResponse, ReplyIntent};
use leavedesk_core::error::Result;
use leavedesk_core::session::{SessionContext, SessionEffect, SessionStats, SessionStore};
use tracing::{error, warn};
use uuid::Uuid;

use crate::conversation::{ConversationMachine, replies};

const TURN_FAILED: &str =
    "I apologize, I encountered an error processing your request. Please try again.";

pub struct ChatService {
    /// Owner of all session state
    sessions: Arc<dyn SessionStore>,
    machine: ConversationMachine,
}

impl ChatService {
    pub fn new(sessions: Arc<dyn SessionStore>, machine: ConversationMachine) -> Self {
        Self { sessions, machine }
    }

    /// Fresh random session id.
    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Handles one chat message. Always produces a response.
    pub async fn handle_message(&self, request: ChatRequest) -> ChatResponse {
        let now = self.machine.clock().now();

        if request.message.trim().is_empty()
            && request.confirmation_action.is_none()
            && request.intent_override.is_none()
        {
            return ChatResponse::new(ReplyIntent::InvalidRequest, replies::empty_message(), now);
        }

        if let Err(err) = self.sessions.sweep_expired(now).await {
            warn!(error = %err, "session sweep failed");
        }

        let session_id = request.session_id().to_string();
        let session = match self.sessions.load(&session_id, now).await {
            Ok(session) => session,
            Err(err) => {
                error!(%session_id, error = %err, "loading session failed");
                return ChatResponse::new(ReplyIntent::Error, TURN_FAILED, now);
            }
        };

        let outcome = self.machine.transition(&session, &request).await;

        let mut effects = Vec::with_capacity(outcome.effects.len() + 1);
        if request.confirmation_action.is_none() {
            effects.push(SessionEffect::RecordHistory {
                message: request.message.clone(),
                intent: outcome.intent,
                at: now,
            });
        }
        effects.extend(outcome.effects);

        if let Err(err) = self.sessions.apply(&session_id, effects, now).await {
            error!(%session_id, error = %err, "applying session effects failed");
            return ChatResponse::new(ReplyIntent::Error, TURN_FAILED, now);
        }

        outcome.response
    }

    pub async fn session(&self, session_id: &str) -> Result<Option<SessionContext>> {
        self.sessions.get(session_id).await
    }

    pub async fn session_stats(&self, session_id: &str) -> Result<Option<SessionStats>> {
        self.sessions.stats(session_id).await
    }

    /// Forgets the session entirely.
    pub async fn clear_session(&self, session_id: &str) -> Result<()> {
        self.sessions.delete(session_id).await
    }
}
