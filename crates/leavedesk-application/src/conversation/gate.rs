//! Business-rule checks run before a request is shown or committed.

use leavedesk_core::chat::ReplyIntent;
use leavedesk_core::holiday::HolidayCalendar;
use leavedesk_core::request::{PendingRequest, RequestKind};
use leavedesk_core::session::{LeaveConflict, SessionContext, SessionEffect};
use leavedesk_core::validation::{
    RuleViolation, check_balance, check_holidays, check_not_past, check_overlap,
};
use tracing::{error, warn};

use super::{ConversationMachine, TurnOutcome, replies};

/// When the checks run. Balance is only checked on submission; a commit
/// re-checks what may have changed since (calendar, dates, other records).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Stage {
    Submit,
    Commit,
}

impl ConversationMachine {
    /// Holiday calendar; an unreadable calendar counts as empty.
    pub(super) async fn holiday_calendar(&self) -> HolidayCalendar {
        match self.holidays.load_calendar().await {
            Ok(calendar) => calendar,
            Err(err) => {
                warn!(error = %err, "holiday calendar unavailable, assuming no holidays");
                HolidayCalendar::default()
            }
        }
    }

    /// Runs every rule for `pending`. `Some` carries the rejection reply.
    pub(super) async fn vet(
        &self,
        session: &SessionContext,
        pending: &PendingRequest,
        stage: Stage,
    ) -> Option<TurnOutcome> {
        let kind = pending.kind();
        let start = pending.start_date();
        let end = pending.end_date();

        let holidays_apply = kind == RequestKind::Leave || self.config().wfh_blocks_on_holidays;
        if holidays_apply {
            let calendar = self.holiday_calendar().await;
            if let Err(violation) = check_holidays(start, end, &calendar.holidays) {
                return Some(self.reject(session, pending, violation, stage));
            }
        }

        let allow_past = kind == RequestKind::Leave && self.config().allow_backdated_leave;
        if let Err(violation) = check_not_past(start, self.today(), allow_past) {
            return Some(self.reject(session, pending, violation, stage));
        }

        let employee_name = match pending {
            PendingRequest::Leave(leave) => &leave.employee_name,
            PendingRequest::Wfh(wfh) => &wfh.employee_name,
        };
        match self
            .records
            .check_leave_overlap(employee_name, start, end)
            .await
        {
            Ok(existing) => {
                if let Err(violation) = check_overlap(&existing, start, end) {
                    return Some(self.reject(session, pending, violation, stage));
                }
            }
            Err(err) => {
                error!(session_id = %session.session_id, error = %err, "overlap check failed");
                return Some(TurnOutcome::reply(
                    self.respond(ReplyIntent::Error, replies::overlap_check_failed()),
                ));
            }
        }

        if let (Stage::Submit, PendingRequest::Leave(leave)) = (stage, pending) {
            let email = session.user_email.as_deref();
            match self
                .records
                .check_leave_balance(email, leave.leave_type, leave.duration_days)
                .await
            {
                Ok(balance) => {
                    if let Err(violation) = check_balance(&balance, leave.duration_days) {
                        return Some(self.reject(session, pending, violation, stage));
                    }
                }
                Err(err) => {
                    error!(session_id = %session.session_id, error = %err, "balance check failed, continuing");
                }
            }
        }

        None
    }

    fn reject(
        &self,
        session: &SessionContext,
        pending: &PendingRequest,
        violation: RuleViolation,
        stage: Stage,
    ) -> TurnOutcome {
        warn!(session_id = %session.session_id, %violation, ?stage, "request rejected");
        let kind = pending.kind();

        match violation {
            RuleViolation::Holiday { date, name } => {
                let (intent, reply) = match (kind, stage) {
                    (RequestKind::Wfh, _) => {
                        (ReplyIntent::WfhOnHoliday, replies::wfh_on_holiday(date, &name))
                    }
                    (RequestKind::Leave, Stage::Submit) => {
                        (ReplyIntent::LeaveOnHoliday, replies::leave_on_holiday(date, &name))
                    }
                    (RequestKind::Leave, Stage::Commit) => {
                        (ReplyIntent::LeaveOnHoliday, replies::holiday_at_commit(date, &name))
                    }
                };
                TurnOutcome::reply(self.respond(intent, reply))
            }
            RuleViolation::PastDate { date, today } => {
                let reply = match (kind, stage) {
                    (RequestKind::Leave, Stage::Commit) => replies::past_date_at_commit(date, today),
                    _ => replies::past_date(kind),
                };
                TurnOutcome::reply(self.respond(ReplyIntent::PastDate, reply))
            }
            RuleViolation::Overlap { existing } => {
                let reply = match stage {
                    Stage::Submit => replies::overlap(&existing),
                    Stage::Commit => replies::overlap_at_commit(&existing, pending.start_date()),
                };
                TurnOutcome::reply(self.respond(ReplyIntent::LeaveOverlap, reply)).with_effects([
                    SessionEffect::SaveLeaveConflict(LeaveConflict {
                        existing: *existing,
                        requested: pending.clone(),
                    }),
                ])
            }
            RuleViolation::InsufficientBalance {
                requested,
                remaining,
                ..
            } => TurnOutcome::reply(self.respond(
                ReplyIntent::LeaveBalanceInsufficient,
                replies::insufficient_balance(requested, remaining),
            )),
        }
    }
}
