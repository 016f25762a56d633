//! Pure decision functions over data supplied by the caller.
//!
//! Nothing here performs I/O; the conversation layer fetches holidays,
//! existing records and balances and hands them in.

use chrono::NaiveDate;
use thiserror::Error;

use crate::holiday::Holiday;
use crate::record::{LeaveBalance, RecordStatus, RequestRecord};
use crate::request::LeaveType;

/// Why a request cannot go ahead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleViolation {
    #[error("{date} is a company holiday ({name})")]
    Holiday { date: NaiveDate, name: String },

    #[error("{date} is in the past (today is {today})")]
    PastDate { date: NaiveDate, today: NaiveDate },

    #[error("overlaps existing leave {}", existing.id)]
    Overlap { existing: Box<RequestRecord> },

    #[error("insufficient {leave_type} balance: requested {requested}, remaining {remaining}")]
    InsufficientBalance {
        leave_type: LeaveType,
        requested: f64,
        remaining: f64,
    },
}

/// First day in `[start, end]` that is a holiday.
pub fn check_holidays(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &[Holiday],
) -> Result<(), RuleViolation> {
    let end = end.max(start);
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .find_map(|day| holidays.iter().find(|holiday| holiday.date == day))
        .map_or(Ok(()), |holiday| {
            Err(RuleViolation::Holiday {
                date: holiday.date,
                name: holiday.name.clone(),
            })
        })
}

pub fn check_not_past(
    start: NaiveDate,
    today: NaiveDate,
    allow_past: bool,
) -> Result<(), RuleViolation> {
    if !allow_past && start < today {
        return Err(RuleViolation::PastDate { date: start, today });
    }
    Ok(())
}

/// First leave record, not rejected, whose interval meets `[start, end]`.
pub fn check_overlap(
    existing: &[RequestRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), RuleViolation> {
    existing
        .iter()
        .find(|record| {
            record.is_leave()
                && record.status != RecordStatus::Rejected
                && record.overlaps(start, end.max(start))
        })
        .map_or(Ok(()), |record| {
            Err(RuleViolation::Overlap {
                existing: Box::new(record.clone()),
            })
        })
}

pub fn check_balance(balance: &LeaveBalance, requested: f64) -> Result<(), RuleViolation> {
    if balance.remaining < requested {
        return Err(RuleViolation::InsufficientBalance {
            leave_type: balance.leave_type,
            requested,
            remaining: balance.remaining,
        });
    }
    Ok(())
}
