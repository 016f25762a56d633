//! Committed leave/WFH records and employee identity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::request::{LeaveType, RequestKind};

/// Approval state of a committed record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RecordStatus {
    /// Submitted, awaiting a manager.
    Pending,
    Approved,
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

impl RecordStatus {
    /// Whether the record still holds the dates it covers.
    pub fn is_active(self) -> bool {
        matches!(self, RecordStatus::Pending | RecordStatus::Approved)
    }

    pub fn marker(self) -> &'static str {
        match self {
            RecordStatus::Approved => "✅",
            RecordStatus::Rejected => "❌",
            RecordStatus::Pending => "⏳",
            RecordStatus::Cancelled => "🚫",
        }
    }
}

/// A persisted leave or WFH request.
///
/// WFH records have no `leave_type` and always span a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub id: String,
    pub kind: RequestKind,
    pub employee_name: String,
    pub employee_email: Option<String>,
    pub employee_id: Option<String>,
    pub leave_type: Option<LeaveType>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: RecordStatus,
    pub duration_days: f64,
    #[serde(default)]
    pub is_half_day: bool,
    pub created_at: DateTime<Utc>,
}

impl RequestRecord {
    /// Inclusive interval intersection.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    pub fn is_leave(&self) -> bool {
        self.kind == RequestKind::Leave
    }

    pub fn belongs_to(&self, email: &str) -> bool {
        self.employee_email
            .as_deref()
            .is_some_and(|owner| owner.eq_ignore_ascii_case(email))
    }
}

/// Employee as known to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl EmployeeProfile {
    /// First word of the name, for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Entitlement of one leave type for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    pub leave_type: LeaveType,
    pub total: f64,
    pub used: f64,
    pub remaining: f64,
}

impl LeaveBalance {
    pub fn new(leave_type: LeaveType, total: f64, used: f64) -> Self {
        Self {
            leave_type,
            total,
            used,
            remaining: (total - used).max(0.0),
        }
    }
}
