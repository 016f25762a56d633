//! Reply texts.

use chrono::{Datelike, NaiveDate};
use leavedesk_core::date::format_human_readable;
use leavedesk_core::holiday::HolidayCalendar;
use leavedesk_core::record::{LeaveBalance, RecordStatus, RequestRecord};
use leavedesk_core::request::{LastRequest, LeaveRequest, PendingRequest, RequestKind, WfhRequest};

// ============================================================================
// Verification
// ============================================================================

pub fn locked(company: &str) -> String {
    format!(
        "I’m unable to continue because we couldn’t verify your {company} email earlier. Please contact HR for assistance."
    )
}

pub fn request_email(company: &str, example: &str) -> String {
    format!(
        "Please enter your {company} email ({example}). I'll use it to find your employee record."
    )
}

pub fn change_email(company: &str, example: &str) -> String {
    format!("Okay, please provide your new {company} email ({example}).")
}

pub fn missing_email(company: &str, domain: &str, remaining: u32) -> String {
    format!(
        "That doesn’t look like a {company} email. Please enter an address that ends with {domain}. Attempts remaining: {remaining}."
    )
}

pub fn wrong_domain(company: &str, example: &str, remaining: u32) -> String {
    format!(
        "Please provide your {company} email in the format {example}. Attempts remaining: {remaining}."
    )
}

pub fn verification_exhausted(company: &str) -> String {
    format!(
        "I still can’t find a valid {company} email. Please contact HR so they can help you get set up."
    )
}

pub fn not_registered(company: &str, remaining: Option<u32>) -> String {
    match remaining {
        Some(remaining) => format!(
            "This email is not registered as a {company} employee. Please contact HR or provide a different {company} email. Attempts remaining: {remaining}."
        ),
        None => format!(
            "This email is not registered as a {company} employee. Please contact HR for assistance."
        ),
    }
}

pub fn verification_error() -> String {
    "I ran into an issue verifying your account right now. Please try again in a moment or contact HR."
        .to_string()
}

pub fn greeting(first_name: &str) -> String {
    format!("Hi {first_name}, your account is verified. How can I help you today?")
}

// ============================================================================
// Request capture
// ============================================================================

pub fn date_error(error: &str, editing: bool) -> String {
    let headline = if error.contains("End date cannot be earlier than start date") {
        "❌ End date cannot be earlier than start date. Please adjust your dates.".to_string()
    } else {
        format!("❌ {error}")
    };
    let follow_up = if editing {
        "Please provide corrected dates to continue editing your request."
    } else {
        "Please correct the date and try again."
    };
    format!("{headline}\n\n{follow_up}")
}

pub fn leave_needs_date() -> String {
    "🗓️ I couldn't find a date in your request.\n\n\
     Please specify when the leave should start. Examples:\n\
     • \"Casual leave on December 20\"\n\
     • \"Sick leave from 15th to 17th\""
        .to_string()
}

pub fn wfh_needs_date(reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!(
            "🏠 I understand your reason: \"{reason}\". Which date would you like to work from home? Please specify the date (e.g., \"tomorrow\", \"December 25\", \"25th Dec\")."
        ),
        None => "🏠 I can help you apply for Work From Home! Please provide:\n\n\
                 1. **Date** (when you want to WFH)\n\
                 2. **Reason** (brief description)\n\n\
                 Example: \"WFH tomorrow for doctor's appointment\""
            .to_string(),
    }
}

/// Integral values without decimals, others with one.
pub fn format_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{days:.0}")
    } else {
        format!("{days:.1}")
    }
}

fn days_label(days: f64) -> String {
    let plural = if days == 1.0 { "" } else { "s" };
    format!("{} day{plural}", format_days(days))
}

fn date_span(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start} to {end}")
    }
}

fn duration_label(leave: &LeaveRequest) -> String {
    if leave.is_half_day {
        "Half day".to_string()
    } else {
        days_label(leave.duration_days)
    }
}

pub fn confirm(pending: &PendingRequest, updated: bool) -> String {
    let updated = if updated { "UPDATED " } else { "" };
    match pending {
        PendingRequest::Leave(leave) => format!(
            "📋 **Please confirm your {updated}leave request:**\n\n\
             • **Type**: {}\n\
             • **Date**: {}\n\
             • **Duration**: {}\n\
             • **Reason**: {}\n\n\
             Select an option below: [Confirm] [Edit] [Cancel].",
            leave.leave_type,
            date_span(leave.start_date, leave.end_date),
            duration_label(leave),
            leave.reason,
        ),
        PendingRequest::Wfh(wfh) => format!(
            "📋 **Please confirm your {updated}WFH request:**\n\n\
             • **Date**: {}\n\
             • **Reason**: {}\n\n\
             Select an option below: [Confirm] [Edit] [Cancel].",
            wfh.date, wfh.reason,
        ),
    }
}

fn leave_created(leave: &LeaveRequest, record_id: &str) -> String {
    format!(
        "✅ Leave request created successfully!\n\n\
         Type: {}\n\
         Date: {}\n\
         Duration: {}\n\
         Reason: {}\n\
         Status: Pending Approval\n\
         Request ID: {record_id}\n\n\
         Your manager has been notified and will review your request shortly.",
        leave.leave_type,
        date_span(leave.start_date, leave.end_date),
        duration_label(leave),
        leave.reason,
    )
}

fn wfh_created(wfh: &WfhRequest, record_id: &str) -> String {
    format!(
        "✅ WFH request created successfully!\n\n\
         Date: {}\n\
         Reason: {}\n\
         Status: Pending Approval\n\
         Request ID: {record_id}\n\n\
         Your manager has been notified and will review your request shortly.",
        wfh.date, wfh.reason,
    )
}

pub fn created(pending: &PendingRequest, record_id: &str) -> String {
    match pending {
        PendingRequest::Leave(leave) => leave_created(leave, record_id),
        PendingRequest::Wfh(wfh) => wfh_created(wfh, record_id),
    }
}

pub fn submit_failed(kind: RequestKind) -> String {
    let label = match kind {
        RequestKind::Leave => "leave",
        RequestKind::Wfh => "WFH",
    };
    format!("❌ Failed to submit {label} request. Please try again or contact support.")
}

// ============================================================================
// Confirmation flow
// ============================================================================

/// A "yes" arriving after the request was already committed.
pub fn already_created(last: Option<&LastRequest>) -> String {
    match last {
        Some(last) => created(&last.request, &last.record_id),
        None => "✅ All set! There's nothing awaiting confirmation.".to_string(),
    }
}

pub fn nothing_cancelled() -> String {
    "ℹ️ Nothing was cancelled because there wasn't a pending request.".to_string()
}

pub fn nothing_to_edit() -> String {
    "ℹ️ There isn't any pending request to edit right now. Start a new request whenever you're ready."
        .to_string()
}

pub fn cancelled() -> String {
    "❌ Request cancelled. No record was created.\n\n\
     Would you like to:\n\
     • Submit a different request?\n\
     • Check your leave balance?\n\
     • View leave policy?"
        .to_string()
}

pub fn unclear() -> String {
    "I didn't understand your response.\n\n\
     Please reply with:\n\
     • \"Yes\" or \"Confirm\" to submit the request\n\
     • \"No\" or \"Cancel\" to cancel the request\n\
     • \"Edit\" to make changes"
        .to_string()
}

pub fn edit_prompt(pending: &PendingRequest) -> String {
    match pending {
        PendingRequest::Leave(leave) => format!(
            "✏️ Got it! Let's update your leave request.\n\n\
             **Current Details:**\n\
             • Type: {}\n\
             • Date: {}\n\
             • Reason: {}\n\n\
             **You can update any of these details:**\n\
             • Change the type (Annual, Sick, Casual)\n\
             • Change the date\n\
             • Change the reason\n\n\
             Please provide the complete NEW information. For example:\n\
             \"Casual leave on 20.12.2025 for family event\"",
            leave.leave_type,
            date_span(leave.start_date, leave.end_date),
            leave.reason,
        ),
        PendingRequest::Wfh(wfh) => format!(
            "✏️ Got it! Let's update your WFH request.\n\n\
             **Current Details:**\n\
             • Date: {}\n\
             • Reason: {}\n\n\
             Please provide the complete NEW information. For example:\n\
             \"WFH on 20.12.2025 for doctor appointment\"",
            wfh.date, wfh.reason,
        ),
    }
}

pub fn edit_after_creation(last: &LastRequest) -> String {
    let kind = last.request.kind();
    format!(
        "ℹ️ Your {kind} request has already been submitted (ID: {}).\n\n\
         To modify an already submitted request, please:\n\
         • Contact your manager directly\n\
         • Or you can create a new {kind} request\n\n\
         Would you like to create a new {kind} request?",
        last.record_id,
    )
}

// ============================================================================
// Rule violations
// ============================================================================

pub fn leave_on_holiday(date: NaiveDate, name: &str) -> String {
    format!("❌ Cannot apply leave on {date} ({name}). It is a company holiday.")
}

pub fn wfh_on_holiday(date: NaiveDate, name: &str) -> String {
    format!("❌ Cannot apply WFH on {date} ({name}). It is a company holiday.")
}

pub fn holiday_at_commit(date: NaiveDate, name: &str) -> String {
    format!(
        "❌ **Cannot create leave request for a company holiday**\n\n\
         {date} ({name}) is a company holiday. Leave applications are not allowed on holidays."
    )
}

pub fn past_date(kind: RequestKind) -> String {
    match kind {
        RequestKind::Leave => "❌ Cannot apply leave for past dates. Please choose a future date or contact your manager for assistance.".to_string(),
        RequestKind::Wfh => "❌ Cannot apply WFH for past dates. Please choose a future date.".to_string(),
    }
}

pub fn past_date_at_commit(date: NaiveDate, today: NaiveDate) -> String {
    format!(
        "❌ **Cannot create leave request for past date**\n\n\
         You're trying to apply for leave on **{}**, which is in the past (today is {today}).\n\n\
         📋 **Policy for Backdated Leave:**\n\
         Leave applications must be submitted in advance. For emergency situations where you were unable to apply beforehand:\n\n\
         • **Sick Leave**: Must be applied within 24 hours with a valid reason\n\
         • **Other Leave Types**: Require manager pre-approval before the absence\n\n\
         **What you can do:**\n\
         • If this was an emergency sick leave, contact your manager directly to explain the situation\n\
         • Your manager can manually approve retrospective leave through the HR system\n\
         • For future leave, please apply at least 2 days in advance",
        format_human_readable(date),
    )
}

fn record_type_label(record: &RequestRecord) -> String {
    record
        .leave_type
        .map(|leave_type| leave_type.to_string())
        .unwrap_or_else(|| "WFH".to_string())
}

pub fn overlap(existing: &RequestRecord) -> String {
    format!(
        "⚠️ You already have {} {} leave from {} to {} (ID: {}).\n\n\
         Please adjust your new request or update the existing leave first.",
        existing.status.as_ref().to_lowercase(),
        record_type_label(existing),
        existing.start_date,
        existing.end_date,
        existing.id,
    )
}

pub fn overlap_at_commit(existing: &RequestRecord, requested_start: NaiveDate) -> String {
    format!(
        "⚠️ **Cannot create leave request**\n\n\
         You already have {} leave from **{}** to **{}**, which includes {requested_start}.\n\n\
         📋 **Existing Leave Details:**\n\
         • Leave ID: {}\n\
         • Type: {}\n\
         • Dates: {} to {}\n\
         • Reason: {}\n\
         • Status: {}",
        existing.status.as_ref().to_lowercase(),
        existing.start_date,
        existing.end_date,
        existing.id,
        record_type_label(existing),
        existing.start_date,
        existing.end_date,
        existing.reason,
        existing.status,
    )
}

pub fn overlap_check_failed() -> String {
    "❌ I couldn't check your existing leave right now. Please try again or contact support."
        .to_string()
}

pub fn insufficient_balance(requested: f64, remaining: f64) -> String {
    format!(
        "⚠️ Insufficient leave balance.\n\n\
         \x20 • Requested: {}\n\
         \x20 • Available: {}\n\n\
         Please reduce the duration or choose a different leave type.",
        days_label(requested),
        days_label(remaining),
    )
}

// ============================================================================
// Informational
// ============================================================================

pub fn leave_policy(company: &str) -> String {
    format!(
        "📋 **{company} Leave Policy Summary**\n\n\
         **Annual Leave:** 21 days (1.75/month) | Carry forward: Max 5 days\n\
         **Sick Leave:** 12 days | Medical cert required for 3+ days\n\
         **Casual Leave:** 12 days | 1 day advance notice required\n\
         **Maternity Leave:** 180 days (26 weeks full pay)\n\
         **Paternity Leave:** 15 days (after 6 months service)\n\n\
         **Application Process:**\n\
         • Minimum 2 days advance notice\n\
         • Manager approval required\n\
         • Emergency: Apply within 24 hours\n\n\
         **Important Notes:**\n\
         • No leaves during first 3 months (probation)\n\
         • Public holidays between leaves count as leave days\n\
         • Half-day leaves available (0.5 increments)"
    )
}

pub fn wfh_policy(company: &str) -> String {
    format!(
        "🏠 **{company} Work From Home (WFH) Policy**\n\n\
         **Eligibility:**\n\
         • Available to all permanent employees after probation\n\
         • Manager approval required\n\
         • Maximum 2 WFH days per week (unless special circumstances)\n\n\
         **Application Process:**\n\
         • Apply at least 1 day in advance\n\
         • Emergency WFH: Notify manager and apply within same day\n\n\
         **Requirements:**\n\
         • Stable internet connection (minimum 10 Mbps)\n\
         • VPN access for secure connectivity\n\
         • Availability during working hours (9 AM - 6 PM)\n\
         • Respond to calls/messages within 15 minutes\n\n\
         **Not Allowed:**\n\
         • WFH during team meetings or client presentations (unless pre-approved)\n\
         • WFH on month-end/quarter-end days (for relevant departments)"
    )
}

pub fn holiday_list(calendar: &HolidayCalendar, company: &str, today: NaiveDate) -> String {
    let company = calendar.company_name.as_deref().unwrap_or(company);
    let month = today.format("%B");
    let mut reply = format!("🎉 **{company} Holidays for {month} {}**\n", today.year());

    let holidays = calendar.in_month(today.year(), today.month());
    if holidays.is_empty() {
        reply.push_str("\nNo official holidays this month.");
    } else {
        reply.push('\n');
        for holiday in holidays {
            let optional = if holiday.optional { " (Optional)" } else { "" };
            reply.push_str(&format!("• {} - {}{optional}\n", holiday.date, holiday.name));
        }
    }

    let notes = &calendar.notes;
    if let Some(optional) = &notes.optional_holidays {
        reply.push_str(&format!("\n{optional}"));
    }
    if let Some(working_days) = &notes.working_days {
        reply.push_str(&format!("\nWorking Days: {working_days}"));
    }
    if let Some(weekends) = &notes.weekends {
        reply.push_str(&format!("\nWeekends: {weekends}"));
    }
    reply
}

pub fn balances(balances: &[LeaveBalance]) -> String {
    let mut reply = "📊 **Your Leave Balance**\n\n".to_string();
    for balance in balances {
        reply.push_str(&format!(
            "• **{}**: {} of {} remaining ({} used)\n",
            balance.leave_type,
            format_days(balance.remaining),
            days_label(balance.total),
            format_days(balance.used),
        ));
    }
    reply.push_str("\nWould you like to apply for leave?");
    reply
}

pub fn balance_unavailable() -> String {
    "Unable to fetch your leave balance right now. Please try again or contact HR.".to_string()
}

pub fn requests(records: &[RequestRecord]) -> String {
    let (leaves, wfh): (Vec<&RequestRecord>, Vec<&RequestRecord>) =
        records.iter().partition(|record| record.is_leave());
    let mut reply = "📋 **Your Requests**\n\n".to_string();

    if !leaves.is_empty() {
        reply.push_str(&format!("**Leave Requests ({})**\n", leaves.len()));
        for leave in leaves {
            reply.push_str(&format!(
                "{} **{}** - {} to {}\n   Status: {} | Reason: {}\n   ID: {}\n\n",
                leave.status.marker(),
                record_type_label(leave),
                leave.start_date,
                leave.end_date,
                leave.status,
                leave.reason,
                leave.id,
            ));
        }
    }

    if !wfh.is_empty() {
        reply.push_str(&format!("\n**WFH Requests ({})**\n", wfh.len()));
        for day in wfh {
            reply.push_str(&format!(
                "{} **{}**\n   Status: {}\n   Reason: {}\n   ID: {}\n\n",
                day.status.marker(),
                day.start_date,
                day.status,
                day.reason,
                day.id,
            ));
        }
    }

    reply.push_str(&format!(
        "\n**Legend:**\n{} Approved | {} Rejected | {} Pending | {} Cancelled\n",
        RecordStatus::Approved.marker(),
        RecordStatus::Rejected.marker(),
        RecordStatus::Pending.marker(),
        RecordStatus::Cancelled.marker(),
    ));
    reply
}

pub fn no_requests() -> String {
    "You haven't made any leave or WFH requests yet.\n\n\
     Would you like to:\n\
     • Apply for leave\n\
     • Apply for WFH\n\
     • Check your leave balance"
        .to_string()
}

pub fn requests_unavailable() -> String {
    "Unable to fetch your requests. Please try again or contact HR.".to_string()
}

pub fn assistant_unavailable() -> String {
    "I'm sorry, I couldn't process that right now. You can ask me to apply for leave or WFH, check your balance, or list holidays."
        .to_string()
}

pub fn empty_message() -> String {
    "Please type a message so I can help you.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leavedesk_core::request::LeaveType;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
    }

    #[test]
    fn day_formatting() {
        assert_eq!(format_days(3.0), "3");
        assert_eq!(format_days(0.5), "0.5");
        assert_eq!(days_label(1.0), "1 day");
        assert_eq!(days_label(12.0), "12 days");
    }

    #[test]
    fn leave_confirmation_summary() {
        let pending = PendingRequest::Leave(LeaveRequest {
            leave_type: LeaveType::Sick,
            start_date: d(15),
            end_date: d(17),
            reason: "Medical reasons".to_string(),
            employee_name: "Asha Rao".to_string(),
            duration_days: 3.0,
            is_half_day: false,
        });

        let reply = confirm(&pending, false);
        assert!(reply.contains("• **Type**: SICK"));
        assert!(reply.contains("• **Date**: 2025-12-15 to 2025-12-17"));
        assert!(reply.contains("• **Duration**: 3 days"));
        assert!(confirm(&pending, true).contains("UPDATED leave request"));
    }

    #[test]
    fn half_day_summary() {
        let pending = PendingRequest::Leave(LeaveRequest {
            leave_type: LeaveType::Casual,
            start_date: d(11),
            end_date: d(11),
            reason: "Personal".to_string(),
            employee_name: "Asha Rao".to_string(),
            duration_days: 0.5,
            is_half_day: true,
        });
        let reply = confirm(&pending, false);
        assert!(reply.contains("• **Date**: 2025-12-11\n"));
        assert!(reply.contains("Half day"));
    }

    #[test]
    fn balance_warning_lists_both_numbers() {
        let reply = insufficient_balance(20.0, 12.0);
        assert!(reply.contains("Requested: 20 days"));
        assert!(reply.contains("Available: 12 days"));
    }

    #[test]
    fn empty_holiday_month() {
        let reply = holiday_list(&HolidayCalendar::default(), "Winfomi", d(10));
        assert!(reply.starts_with("🎉 **Winfomi Holidays for December 2025**"));
        assert!(reply.contains("No official holidays this month."));
    }
}
