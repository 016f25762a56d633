//! Chat turn input and output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::extract::Confirmation;
use crate::intent::Intent;
use crate::request::{LeaveType, PendingRequest};

/// Session used when a request carries none.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Explicit edit requested by a button rather than by text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentOverride {
    EditLeave,
    EditWfh,
}

/// Structured edit form. Present fields replace the pending ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditDetails {
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// WFH date.
    pub date: Option<NaiveDate>,
    pub reason: Option<String>,
}

impl EditDetails {
    pub fn is_empty(&self) -> bool {
        self.leave_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.date.is_none()
            && self
                .reason
                .as_deref()
                .is_none_or(|reason| reason.trim().is_empty())
    }
}

/// One inbound chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    pub employee_email: Option<String>,
    pub confirmation_action: Option<Confirmation>,
    pub intent_override: Option<IntentOverride>,
    pub edit_details: Option<EditDetails>,
}

impl ChatRequest {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.employee_email = Some(email.into());
        self
    }

    pub fn with_confirmation(mut self, action: Confirmation) -> Self {
        self.confirmation_action = Some(action);
        self
    }

    pub fn with_edit(mut self, intent: IntentOverride, details: EditDetails) -> Self {
        self.intent_override = Some(intent);
        self.edit_details = Some(details);
        self
    }

    pub fn session_id(&self) -> &str {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID)
    }
}

/// Tag describing what a reply is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReplyIntent {
    RequestEmail,
    EmailVerificationLocked,
    EmailVerificationFailed,
    EmailVerificationError,
    EmailVerified,
    NoPendingConfirmation,
    ValidationError,
    LeaveOnHoliday,
    WfhOnHoliday,
    LeaveBalanceInsufficient,
    ConfirmLeave,
    ConfirmWfh,
    EditRequest,
    LeaveCreated,
    WfhCreated,
    PastDate,
    LeaveOverlap,
    Error,
    ConfirmationNo,
    ConfirmationUnclear,
    EditAfterCreation,
    RequestsListed,
    NoRequestsFound,
    NeedMoreDetails,
    ApplyLeave,
    ApplyWfh,
    HolidayList,
    LeavePolicy,
    WfhPolicy,
    LeaveBalance,
    GeneralQuery,
    InvalidRequest,
}

impl From<Intent> for ReplyIntent {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::ApplyLeave => ReplyIntent::ApplyLeave,
            Intent::ApplyWfh => ReplyIntent::ApplyWfh,
            Intent::HolidayList => ReplyIntent::HolidayList,
            Intent::LeavePolicy => ReplyIntent::LeavePolicy,
            Intent::WfhPolicy => ReplyIntent::WfhPolicy,
            Intent::ListRequests => ReplyIntent::RequestsListed,
            Intent::LeaveBalance => ReplyIntent::LeaveBalance,
            Intent::GeneralQuery => ReplyIntent::GeneralQuery,
        }
    }
}

/// The answer to one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub intent: ReplyIntent,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub show_buttons: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_request: Option<PendingRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl ChatResponse {
    pub fn new(intent: ReplyIntent, reply: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            reply: reply.into(),
            intent,
            timestamp,
            show_buttons: false,
            pending_request: None,
            record_id: None,
        }
    }

    /// Attaches the pending request and asks the client to show
    /// Confirm / Edit / Cancel buttons.
    pub fn with_pending(mut self, pending: PendingRequest) -> Self {
        self.show_buttons = true;
        self.pending_request = Some(pending);
        self
    }

    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }
}
