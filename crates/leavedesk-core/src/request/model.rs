//! Leave and WFH request domain model.
//!
//! A request starts life as loosely-typed [`LeaveDetails`] /
//! [`WfhDetails`] produced by the extractor, is defaulted into a
//! [`LeaveRequest`] / [`WfhRequest`], and waits in the session as a
//! [`PendingRequest`] until the employee confirms it.
//!
//! [`LeaveDetails`]: crate::extract::LeaveDetails
//! [`WfhDetails`]: crate::extract::WfhDetails

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::date::calculate_inclusive_days;
use crate::extract::{LeaveDetails, WfhDetails};

/// Reason recorded when the employee gives none.
pub const DEFAULT_REASON: &str = "Personal";

/// Kinds of leave an employee can take.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LeaveType {
    Annual,
    Sick,
    Casual,
    Maternity,
    Paternity,
}

impl LeaveType {
    /// Yearly entitlement in days under the company leave policy.
    pub fn entitlement_days(self) -> f64 {
        match self {
            LeaveType::Annual => 21.0,
            LeaveType::Sick => 12.0,
            LeaveType::Casual => 12.0,
            LeaveType::Maternity => 180.0,
            LeaveType::Paternity => 15.0,
        }
    }
}

/// Leave or WFH, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum RequestKind {
    Leave,
    Wfh,
}

/// A fully-defaulted leave request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub employee_name: String,
    pub duration_days: f64,
    pub is_half_day: bool,
}

impl LeaveRequest {
    /// Applies the defaulting rules to extracted details.
    ///
    /// Missing type becomes CASUAL, missing reason becomes "Personal",
    /// missing end becomes the start date. A half day collapses to a
    /// single day of 0.5. Returns `None` without a start date.
    pub fn from_details(details: &LeaveDetails, employee_name: impl Into<String>) -> Option<Self> {
        let start_date = details.start_date?;
        let (end_date, duration_days) = if details.is_half_day {
            (start_date, 0.5)
        } else {
            let end_date = details.end_date.unwrap_or(start_date);
            let duration = details
                .duration_days
                .filter(|days| *days > 0.0)
                .unwrap_or_else(|| calculate_inclusive_days(start_date, end_date, false));
            (end_date, duration)
        };

        Some(Self {
            leave_type: details.leave_type.unwrap_or(LeaveType::Casual),
            start_date,
            end_date,
            reason: non_empty_reason(details.reason.as_deref()),
            employee_name: employee_name.into(),
            duration_days,
            is_half_day: details.is_half_day,
        })
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }
}

/// A fully-defaulted work-from-home request. Always a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WfhRequest {
    pub date: NaiveDate,
    pub reason: String,
    pub employee_name: String,
}

impl WfhRequest {
    pub fn from_details(details: &WfhDetails, employee_name: impl Into<String>) -> Option<Self> {
        Some(Self {
            date: details.date?,
            reason: non_empty_reason(details.reason.as_deref()),
            employee_name: employee_name.into(),
        })
    }
}

/// The request awaiting a yes/no from the employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingRequest {
    Leave(LeaveRequest),
    Wfh(WfhRequest),
}

impl PendingRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            PendingRequest::Leave(_) => RequestKind::Leave,
            PendingRequest::Wfh(_) => RequestKind::Wfh,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        match self {
            PendingRequest::Leave(leave) => leave.start_date,
            PendingRequest::Wfh(wfh) => wfh.date,
        }
    }

    pub fn end_date(&self) -> NaiveDate {
        match self {
            PendingRequest::Leave(leave) => leave.end_date,
            PendingRequest::Wfh(wfh) => wfh.date,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            PendingRequest::Leave(leave) => &leave.reason,
            PendingRequest::Wfh(wfh) => &wfh.reason,
        }
    }
}

/// The most recently committed request of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastRequest {
    pub record_id: String,
    pub request: PendingRequest,
    pub committed_at: DateTime<Utc>,
}

fn non_empty_reason(reason: Option<&str>) -> String {
    reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(DEFAULT_REASON)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn leave_type_text_forms() {
        assert_eq!(LeaveType::from_str("sick").unwrap(), LeaveType::Sick);
        assert_eq!(LeaveType::from_str("ANNUAL").unwrap(), LeaveType::Annual);
        assert_eq!(LeaveType::Paternity.to_string(), "PATERNITY");
        assert_eq!(serde_json::to_string(&LeaveType::Casual).unwrap(), "\"CASUAL\"");
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let details = LeaveDetails {
            start_date: Some(d(2025, 12, 15)),
            ..Default::default()
        };
        let request = LeaveRequest::from_details(&details, "Asha Rao").unwrap();
        assert_eq!(request.leave_type, LeaveType::Casual);
        assert_eq!(request.reason, DEFAULT_REASON);
        assert_eq!(request.end_date, d(2025, 12, 15));
        assert_eq!(request.duration_days, 1.0);
        assert!(request.is_single_day());
    }

    #[test]
    fn half_day_collapses_range() {
        let details = LeaveDetails {
            start_date: Some(d(2025, 12, 15)),
            end_date: Some(d(2025, 12, 17)),
            is_half_day: true,
            reason: Some("   ".to_string()),
            ..Default::default()
        };
        let request = LeaveRequest::from_details(&details, "Asha Rao").unwrap();
        assert_eq!(request.end_date, request.start_date);
        assert_eq!(request.duration_days, 0.5);
        assert_eq!(request.reason, DEFAULT_REASON);
    }

    #[test]
    fn no_start_no_request() {
        assert!(LeaveRequest::from_details(&LeaveDetails::default(), "x").is_none());
        assert!(WfhRequest::from_details(&WfhDetails::default(), "x").is_none());
    }

    #[test]
    fn pending_request_is_tagged() {
        let pending = PendingRequest::Wfh(WfhRequest {
            date: d(2025, 12, 12),
            reason: "Plumber visit".to_string(),
            employee_name: "Asha Rao".to_string(),
        });
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["kind"], "wfh");
        assert_eq!(json["date"], "2025-12-12");
        assert_eq!(json["employeeName"], "Asha Rao");

        let back: PendingRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), RequestKind::Wfh);
        assert_eq!(back.start_date(), back.end_date());
    }
}
