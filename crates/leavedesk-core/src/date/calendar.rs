//! Day arithmetic shared by the parser, the extractor and the rules.

use chrono::{Days, NaiveDate};

/// Number of calendar days covered by `[start, end]`, both ends included.
///
/// Weekends count. A half day is always `0.5`; an inverted range is `0`.
pub fn calculate_inclusive_days(start: NaiveDate, end: NaiveDate, is_half_day: bool) -> f64 {
    if is_half_day {
        return 0.5;
    }
    let span = (end - start).num_days() + 1;
    if span <= 0 { 0.0 } else { span as f64 }
}

/// Last day of a leave that starts on `start` and lasts `duration_days`.
///
/// Fractional durations round up, so 2.5 days starting Monday end on
/// Wednesday. Anything up to a single day ends where it starts.
pub fn project_end_date(start: NaiveDate, duration_days: f64) -> NaiveDate {
    if !duration_days.is_finite() || duration_days <= 1.0 {
        return start;
    }
    let extra = duration_days.ceil() as u64 - 1;
    start.checked_add_days(Days::new(extra)).unwrap_or(start)
}

/// Whether `date` lies strictly before `today`.
pub fn is_past_date(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// "December 20, 2025"
pub fn format_human_readable(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
