//! The conversation state machine.
//!
//! A turn is a pure function of the session snapshot and the inbound
//! request: [`ConversationMachine::transition`] returns the reply together
//! with the [`SessionEffect`]s to apply. Collaborators (record store,
//! holiday calendar, general assistant) are awaited but never mutate the
//! session themselves.

mod confirmation;
mod gate;
mod intents;
pub mod replies;
mod state;
mod verification;

pub use state::ConversationState;

use std::sync::Arc;

use chrono::NaiveDate;
use leavedesk_core::assistant::GeneralAssistant;
use leavedesk_core::chat::{ChatRequest, ChatResponse, ReplyIntent};
use leavedesk_core::clock::Clock;
use leavedesk_core::config::LeaveDeskConfig;
use leavedesk_core::holiday::HolidayRepository;
use leavedesk_core::intent::Intent;
use leavedesk_core::record::RecordStore;
use leavedesk_core::session::{SessionContext, SessionEffect};
use tracing::debug;

/// Reply plus the session changes a turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub response: ChatResponse,
    pub effects: Vec<SessionEffect>,
    /// Intent detected for the message, kept in the history.
    pub intent: Option<Intent>,
}

impl TurnOutcome {
    pub fn reply(response: ChatResponse) -> Self {
        Self {
            response,
            effects: Vec::new(),
            intent: None,
        }
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = SessionEffect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Puts `effects` ahead of the ones already present.
    pub fn after(mut self, effects: impl IntoIterator<Item = SessionEffect>) -> Self {
        let mut combined: Vec<SessionEffect> = effects.into_iter().collect();
        combined.append(&mut self.effects);
        self.effects = combined;
        self
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }
}

/// Drives one conversation turn at a time.
#[derive(Clone)]
pub struct ConversationMachine {
    records: Arc<dyn RecordStore>,
    holidays: Arc<dyn HolidayRepository>,
    assistant: Arc<dyn GeneralAssistant>,
    clock: Arc<dyn Clock>,
    config: Arc<LeaveDeskConfig>,
}

impl ConversationMachine {
    pub fn new(
        records: Arc<dyn RecordStore>,
        holidays: Arc<dyn HolidayRepository>,
        assistant: Arc<dyn GeneralAssistant>,
        clock: Arc<dyn Clock>,
        config: LeaveDeskConfig,
    ) -> Self {
        Self {
            records,
            holidays,
            assistant,
            clock,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &LeaveDeskConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Computes the reply and session effects for one request.
    ///
    /// Never fails: collaborator errors become error replies.
    pub async fn transition(&self, session: &SessionContext, request: &ChatRequest) -> TurnOutcome {
        let state = ConversationState::of(session);
        debug!(session_id = %session.session_id, ?state, "conversation turn");

        if state != ConversationState::Locked && verification::is_change_email(&request.message) {
            return self.change_email();
        }

        match state {
            ConversationState::Locked => TurnOutcome::reply(self.respond(
                ReplyIntent::EmailVerificationLocked,
                replies::locked(&self.config.company_name),
            )),
            ConversationState::Unverified | ConversationState::AwaitingEmail => {
                self.verify(session, request).await
            }
            ConversationState::PendingConfirmation => self.handle_pending(session, request).await,
            ConversationState::Idle => self.handle_idle(session, request).await,
        }
    }

    fn respond(&self, intent: ReplyIntent, reply: impl Into<String>) -> ChatResponse {
        ChatResponse::new(intent, reply, self.clock.now())
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Name used on records: the verified name, else the configured default.
    fn employee_name(&self, session: &SessionContext) -> String {
        session
            .employee_name
            .clone()
            .unwrap_or_else(|| self.config.default_employee_name.clone())
    }
}
