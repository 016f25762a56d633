//! Confirm, cancel and edit of the pending request.

use chrono::NaiveDate;
use leavedesk_core::chat::{ChatRequest, EditDetails, ReplyIntent};
use leavedesk_core::extract::{
    Confirmation, LeaveDetails, extract_confirmation, extract_leave_details, extract_wfh_details,
    is_edit_request, refers_back_to_request,
};
use leavedesk_core::request::{
    LastRequest, LeaveRequest, LeaveType, PendingRequest, WfhRequest,
};
use leavedesk_core::session::{SessionContext, SessionEffect};
use tracing::{error, info};

use super::gate::Stage;
use super::{ConversationMachine, TurnOutcome, replies};

/// Changes asked for while editing a pending leave request.
#[derive(Debug, Default)]
struct LeaveEdit {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    duration_days: Option<f64>,
    is_half_day: bool,
    leave_type: Option<LeaveType>,
    reason: Option<String>,
}

impl LeaveEdit {
    fn from_form(form: &EditDetails) -> Self {
        Self {
            start_date: form.start_date,
            end_date: form.end_date,
            leave_type: form.leave_type,
            reason: clean(form.reason.as_deref()),
            ..Default::default()
        }
    }

    fn from_details(details: LeaveDetails) -> Self {
        Self {
            start_date: details.start_date,
            end_date: details.end_date,
            duration_days: details.duration_days,
            is_half_day: details.is_half_day,
            leave_type: details.leave_type,
            reason: details.reason,
        }
    }

    fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && !self.is_half_day
            && self.leave_type.is_none()
            && self.reason.is_none()
    }

    /// Present fields win. A new start date replaces the whole date group.
    fn merge_into(self, current: &LeaveRequest) -> LeaveDetails {
        let mut details = LeaveDetails {
            leave_type: self.leave_type.or(Some(current.leave_type)),
            reason: self.reason.or_else(|| Some(current.reason.clone())),
            employee_name: Some(current.employee_name.clone()),
            ..Default::default()
        };

        if let Some(start) = self.start_date {
            details.start_date = Some(start);
            details.end_date = self.end_date;
            details.duration_days = self.duration_days;
            details.is_half_day = self.is_half_day;
        } else {
            details.start_date = Some(current.start_date);
            if self.is_half_day {
                details.is_half_day = true;
            } else if let Some(end) = self.end_date {
                details.end_date = Some(end);
            } else {
                details.end_date = Some(current.end_date);
                details.duration_days = Some(current.duration_days);
                details.is_half_day = current.is_half_day;
            }
        }
        details
    }
}

fn clean(reason: Option<&str>) -> Option<String> {
    reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .map(str::to_string)
}

impl ConversationMachine {
    fn confirmation_of(request: &ChatRequest) -> Option<Confirmation> {
        request
            .confirmation_action
            .or_else(|| extract_confirmation(&request.message))
    }

    fn wants_edit(request: &ChatRequest) -> bool {
        request.intent_override.is_some() || is_edit_request(&request.message)
    }

    pub(super) async fn handle_pending(
        &self,
        session: &SessionContext,
        request: &ChatRequest,
    ) -> TurnOutcome {
        let Some(pending) = session.pending_confirmation.as_ref() else {
            return self.handle_idle(session, request).await;
        };

        if Self::wants_edit(request) {
            return self.edit(session, request, pending).await;
        }

        match Self::confirmation_of(request) {
            Some(Confirmation::Yes) => self.commit(session, pending).await,
            Some(Confirmation::No) => {
                info!(session_id = %session.session_id, kind = %pending.kind(), "pending request cancelled");
                TurnOutcome::reply(self.respond(ReplyIntent::ConfirmationNo, replies::cancelled()))
                    .with_effects([SessionEffect::ClearPending])
            }
            None => TurnOutcome::reply(
                self.respond(ReplyIntent::ConfirmationUnclear, replies::unclear())
                    .with_pending(pending.clone()),
            ),
        }
    }

    pub(super) async fn handle_idle(
        &self,
        session: &SessionContext,
        request: &ChatRequest,
    ) -> TurnOutcome {
        if let Some(answer) = Self::confirmation_of(request) {
            let reply = match answer {
                Confirmation::Yes => replies::already_created(session.last_request.as_ref()),
                Confirmation::No => replies::nothing_cancelled(),
            };
            return TurnOutcome::reply(self.respond(ReplyIntent::NoPendingConfirmation, reply));
        }

        if request.intent_override.is_some() || refers_back_to_request(&request.message) {
            if let Some(last) = &session.last_request {
                return TurnOutcome::reply(self.respond(
                    ReplyIntent::EditAfterCreation,
                    replies::edit_after_creation(last),
                ));
            }
            if request.intent_override.is_some() {
                return TurnOutcome::reply(
                    self.respond(ReplyIntent::NoPendingConfirmation, replies::nothing_to_edit()),
                );
            }
        }

        self.dispatch(session, request).await
    }

    /// Clears the pending request, re-checks it, then creates the record.
    async fn commit(&self, session: &SessionContext, pending: &PendingRequest) -> TurnOutcome {
        if let Some(blocked) = self.vet(session, pending, Stage::Commit).await {
            return blocked.after([SessionEffect::ClearPending]);
        }

        let employee = session.employee();
        let created = match pending {
            PendingRequest::Leave(leave) => {
                self.records
                    .create_leave_record(employee.as_ref(), leave)
                    .await
            }
            PendingRequest::Wfh(wfh) => self.records.create_wfh_record(employee.as_ref(), wfh).await,
        };

        match created {
            Ok(record) => {
                info!(
                    session_id = %session.session_id,
                    record_id = %record.id,
                    kind = %pending.kind(),
                    "request committed"
                );
                let intent = match pending {
                    PendingRequest::Leave(_) => ReplyIntent::LeaveCreated,
                    PendingRequest::Wfh(_) => ReplyIntent::WfhCreated,
                };
                let response = self
                    .respond(intent, replies::created(pending, &record.id))
                    .with_record_id(record.id.clone());
                TurnOutcome::reply(response).with_effects([
                    SessionEffect::ClearPending,
                    SessionEffect::ClearLeaveConflict,
                    SessionEffect::SaveLastRequest(LastRequest {
                        record_id: record.id,
                        request: pending.clone(),
                        committed_at: self.clock().now(),
                    }),
                ])
            }
            Err(err) => {
                error!(session_id = %session.session_id, error = %err, "record creation failed");
                TurnOutcome::reply(
                    self.respond(ReplyIntent::Error, replies::submit_failed(pending.kind())),
                )
                .with_effects([SessionEffect::ClearPending])
            }
        }
    }

    async fn edit(
        &self,
        session: &SessionContext,
        request: &ChatRequest,
        pending: &PendingRequest,
    ) -> TurnOutcome {
        let form = request.edit_details.as_ref().filter(|form| !form.is_empty());
        let today = self.today();

        let updated = match pending {
            PendingRequest::Leave(current) => {
                let edit = match form {
                    Some(form) => LeaveEdit::from_form(form),
                    None => {
                        let details = extract_leave_details(&request.message, today);
                        if let Some(problem) = details.errors.first() {
                            return self.edit_rejected(pending, replies::date_error(problem, true));
                        }
                        LeaveEdit::from_details(details)
                    }
                };
                if edit.is_empty() {
                    return self.edit_prompt(pending);
                }

                let merged = edit.merge_into(current);
                if let (Some(start), Some(end)) = (merged.start_date, merged.end_date) {
                    if end < start {
                        return self.edit_rejected(
                            pending,
                            replies::date_error("End date cannot be earlier than start date.", true),
                        );
                    }
                }
                match LeaveRequest::from_details(&merged, current.employee_name.clone()) {
                    Some(leave) => PendingRequest::Leave(leave),
                    None => return self.edit_prompt(pending),
                }
            }
            PendingRequest::Wfh(current) => {
                let (date, reason) = match form {
                    Some(form) => (form.date.or(form.start_date), clean(form.reason.as_deref())),
                    None => {
                        let details = extract_wfh_details(&request.message, today);
                        if let Some(problem) = details.errors.first() {
                            return self.edit_rejected(pending, replies::date_error(problem, true));
                        }
                        (details.date, details.reason)
                    }
                };
                if date.is_none() && reason.is_none() {
                    return self.edit_prompt(pending);
                }
                PendingRequest::Wfh(WfhRequest {
                    date: date.unwrap_or(current.date),
                    reason: reason.unwrap_or_else(|| current.reason.clone()),
                    employee_name: current.employee_name.clone(),
                })
            }
        };

        if let Some(blocked) = self.vet(session, &updated, Stage::Submit).await {
            return blocked;
        }

        info!(session_id = %session.session_id, kind = %updated.kind(), "pending request edited");
        let intent = match updated {
            PendingRequest::Leave(_) => ReplyIntent::ConfirmLeave,
            PendingRequest::Wfh(_) => ReplyIntent::ConfirmWfh,
        };
        let response = self
            .respond(intent, replies::confirm(&updated, true))
            .with_pending(updated.clone());
        TurnOutcome::reply(response).with_effects([SessionEffect::SetPending(updated)])
    }

    fn edit_prompt(&self, pending: &PendingRequest) -> TurnOutcome {
        TurnOutcome::reply(
            self.respond(ReplyIntent::EditRequest, replies::edit_prompt(pending))
                .with_pending(pending.clone()),
        )
    }

    fn edit_rejected(&self, pending: &PendingRequest, reply: String) -> TurnOutcome {
        TurnOutcome::reply(
            self.respond(ReplyIntent::ValidationError, reply)
                .with_pending(pending.clone()),
        )
    }
}
