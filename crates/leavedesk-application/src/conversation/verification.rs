//! Email-based identity verification.

use leavedesk_core::chat::{ChatRequest, ReplyIntent};
use leavedesk_core::extract::{extract_email, is_company_email};
use leavedesk_core::session::{SessionContext, SessionEffect};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, warn};

use super::{ConversationMachine, TurnOutcome, replies};

static CHANGE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:change|update|edit)\s+(?:my\s+)?email\b").unwrap());

pub(super) fn is_change_email(message: &str) -> bool {
    CHANGE_EMAIL.is_match(message)
}

/// How a failed attempt should be answered.
enum Failure {
    NoAddress,
    WrongDomain,
    NotRegistered,
}

impl ConversationMachine {
    pub(super) fn change_email(&self) -> TurnOutcome {
        let config = self.config();
        TurnOutcome::reply(self.respond(
            ReplyIntent::RequestEmail,
            replies::change_email(&config.company_name, &config.example_email()),
        ))
        .with_effects([SessionEffect::ClearEmployee, SessionEffect::ClearPending])
    }

    pub(super) async fn verify(&self, session: &SessionContext, request: &ChatRequest) -> TurnOutcome {
        let config = self.config();
        let candidate = extract_email(&request.message).or_else(|| {
            request
                .employee_email
                .as_deref()
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(str::to_string)
        });

        let Some(email) = candidate else {
            if !session.awaiting_email {
                return TurnOutcome::reply(self.respond(
                    ReplyIntent::RequestEmail,
                    replies::request_email(&config.company_name, &config.example_email()),
                ))
                .with_effects([SessionEffect::SetAwaitingEmail(true)]);
            }
            return self.failed_attempt(session, Failure::NoAddress);
        };

        if !is_company_email(&email, &config.email_domain) {
            warn!(session_id = %session.session_id, %email, "email outside company domain");
            return self.failed_attempt(session, Failure::WrongDomain);
        }

        match self.records.lookup_user_by_email(&email.to_lowercase()).await {
            Ok(Some(profile)) => {
                info!(session_id = %session.session_id, employee_id = %profile.id, "employee verified");
                let greeting = replies::greeting(profile.first_name());
                TurnOutcome::reply(self.respond(ReplyIntent::EmailVerified, greeting))
                    .with_effects([SessionEffect::BindEmployee(profile)])
            }
            Ok(None) => {
                warn!(session_id = %session.session_id, %email, "email not in directory");
                self.failed_attempt(session, Failure::NotRegistered)
            }
            Err(err) => {
                error!(session_id = %session.session_id, error = %err, "employee lookup failed");
                TurnOutcome::reply(
                    self.respond(ReplyIntent::EmailVerificationError, replies::verification_error()),
                )
                .with_effects([SessionEffect::SetAwaitingEmail(true)])
            }
        }
    }

    /// Counts an attempt; the last permitted one locks the session.
    fn failed_attempt(&self, session: &SessionContext, failure: Failure) -> TurnOutcome {
        let config = self.config();
        let company = &config.company_name;
        let limit = config.max_email_attempts.max(1);
        let attempt = session.email_attempts.saturating_add(1);
        let remaining = limit.saturating_sub(attempt);

        let response = if remaining == 0 {
            warn!(session_id = %session.session_id, "email verification locked");
            let reply = match failure {
                Failure::NotRegistered => replies::not_registered(company, None),
                Failure::NoAddress | Failure::WrongDomain => {
                    replies::verification_exhausted(company)
                }
            };
            self.respond(ReplyIntent::EmailVerificationFailed, reply)
        } else {
            let reply = match failure {
                Failure::NoAddress => {
                    replies::missing_email(company, &config.email_domain, remaining)
                }
                Failure::WrongDomain => {
                    replies::wrong_domain(company, &config.example_email(), remaining)
                }
                Failure::NotRegistered => replies::not_registered(company, Some(remaining)),
            };
            self.respond(ReplyIntent::RequestEmail, reply)
        };

        TurnOutcome::reply(response).with_effects([
            SessionEffect::SetAwaitingEmail(true),
            SessionEffect::IncrementEmailAttempts,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_email_phrases() {
        assert!(is_change_email("I want to change email"));
        assert!(is_change_email("please update my email"));
        assert!(!is_change_email("email me the policy"));
    }
}
