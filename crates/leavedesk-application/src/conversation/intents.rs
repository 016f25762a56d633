//! Intent dispatch for verified sessions with nothing pending.

use leavedesk_core::chat::{ChatRequest, ReplyIntent};
use leavedesk_core::extract::{extract_leave_details, extract_wfh_details};
use leavedesk_core::intent::{Intent, detect_intent, mentions_leave, mentions_wfh};
use leavedesk_core::request::{LeaveRequest, PendingRequest, WfhRequest};
use leavedesk_core::session::{SessionContext, SessionEffect};
use tracing::{error, info};

use super::gate::Stage;
use super::{ConversationMachine, TurnOutcome, replies};

/// History entries handed to the general assistant.
const ASSISTANT_HISTORY: usize = 3;

impl ConversationMachine {
    pub(super) async fn dispatch(&self, session: &SessionContext, request: &ChatRequest) -> TurnOutcome {
        let message = request.message.as_str();
        let intent = detect_intent(message);
        info!(session_id = %session.session_id, %intent, "dispatching intent");

        let outcome = match intent {
            Intent::ApplyLeave => self.apply_leave(session, message).await,
            Intent::ApplyWfh => self.apply_wfh(session, message).await,
            Intent::HolidayList => {
                let calendar = self.holiday_calendar().await;
                let reply =
                    replies::holiday_list(&calendar, &self.config().company_name, self.today());
                TurnOutcome::reply(self.respond(ReplyIntent::HolidayList, reply))
            }
            Intent::LeavePolicy => TurnOutcome::reply(self.respond(
                ReplyIntent::LeavePolicy,
                replies::leave_policy(&self.config().company_name),
            )),
            Intent::WfhPolicy => TurnOutcome::reply(self.respond(
                ReplyIntent::WfhPolicy,
                replies::wfh_policy(&self.config().company_name),
            )),
            Intent::ListRequests => self.list_requests(session).await,
            Intent::LeaveBalance => self.leave_balance(session).await,
            Intent::GeneralQuery => self.fallback(session, message).await,
        };
        outcome.with_intent(intent)
    }

    async fn apply_leave(&self, session: &SessionContext, message: &str) -> TurnOutcome {
        let details = extract_leave_details(message, self.today());
        if let Some(problem) = details.errors.first() {
            return TurnOutcome::reply(
                self.respond(ReplyIntent::ValidationError, replies::date_error(problem, false)),
            );
        }

        let Some(leave) = LeaveRequest::from_details(&details, self.employee_name(session)) else {
            return TurnOutcome::reply(
                self.respond(ReplyIntent::NeedMoreDetails, replies::leave_needs_date()),
            );
        };

        self.propose(session, PendingRequest::Leave(leave)).await
    }

    async fn apply_wfh(&self, session: &SessionContext, message: &str) -> TurnOutcome {
        let details = extract_wfh_details(message, self.today());
        if let Some(problem) = details.errors.first() {
            return TurnOutcome::reply(
                self.respond(ReplyIntent::ValidationError, replies::date_error(problem, false)),
            );
        }

        let Some(wfh) = WfhRequest::from_details(&details, self.employee_name(session)) else {
            return TurnOutcome::reply(self.respond(
                ReplyIntent::NeedMoreDetails,
                replies::wfh_needs_date(details.reason.as_deref()),
            ));
        };

        self.propose(session, PendingRequest::Wfh(wfh)).await
    }

    /// Validates and parks the request for confirmation.
    async fn propose(&self, session: &SessionContext, pending: PendingRequest) -> TurnOutcome {
        if let Some(blocked) = self.vet(session, &pending, Stage::Submit).await {
            return blocked;
        }

        let intent = match pending {
            PendingRequest::Leave(_) => ReplyIntent::ConfirmLeave,
            PendingRequest::Wfh(_) => ReplyIntent::ConfirmWfh,
        };
        let response = self
            .respond(intent, replies::confirm(&pending, false))
            .with_pending(pending.clone());
        TurnOutcome::reply(response).with_effects([
            SessionEffect::ClearLeaveConflict,
            SessionEffect::SetPending(pending),
        ])
    }

    async fn list_requests(&self, session: &SessionContext) -> TurnOutcome {
        let Some(email) = session.user_email.as_deref() else {
            return TurnOutcome::reply(self.respond(ReplyIntent::NoRequestsFound, replies::no_requests()));
        };

        match self.records.list_requests_by_email(email).await {
            Ok(records) if records.is_empty() => {
                TurnOutcome::reply(self.respond(ReplyIntent::NoRequestsFound, replies::no_requests()))
            }
            Ok(records) => TurnOutcome::reply(
                self.respond(ReplyIntent::RequestsListed, replies::requests(&records)),
            ),
            Err(err) => {
                error!(session_id = %session.session_id, error = %err, "listing requests failed");
                TurnOutcome::reply(self.respond(ReplyIntent::Error, replies::requests_unavailable()))
            }
        }
    }

    async fn leave_balance(&self, session: &SessionContext) -> TurnOutcome {
        match self
            .records
            .get_leave_balance(session.user_email.as_deref())
            .await
        {
            Ok(balances) => TurnOutcome::reply(
                self.respond(ReplyIntent::LeaveBalance, replies::balances(&balances)),
            ),
            Err(err) => {
                error!(session_id = %session.session_id, error = %err, "balance lookup failed");
                TurnOutcome::reply(self.respond(ReplyIntent::Error, replies::balance_unavailable()))
            }
        }
    }

    /// Implicit leave/WFH requests, then the general assistant.
    async fn fallback(&self, session: &SessionContext, message: &str) -> TurnOutcome {
        let today = self.today();
        if mentions_leave(message) && extract_leave_details(message, today).start_date.is_some() {
            return self.apply_leave(session, message).await;
        }
        if mentions_wfh(message) && extract_wfh_details(message, today).date.is_some() {
            return self.apply_wfh(session, message).await;
        }

        let history = session.recent_history(ASSISTANT_HISTORY);
        match self.assistant.answer(message, &history).await {
            Ok(answer) => TurnOutcome::reply(self.respond(ReplyIntent::GeneralQuery, answer)),
            Err(err) => {
                error!(session_id = %session.session_id, error = %err, "general assistant failed");
                TurnOutcome::reply(
                    self.respond(ReplyIntent::GeneralQuery, replies::assistant_unavailable()),
                )
            }
        }
    }
}
