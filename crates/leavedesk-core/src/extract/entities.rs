//! Structured details from a single chat message.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{calculate_inclusive_days, parse_dates, parse_duration, project_end_date};
use crate::request::LeaveType;

use super::keywords::{
    CONFIRMATION_FILLER, CONFIRMATIONS, EDIT_WORDS, EXPLICIT_LEAVE_TYPES, INFERRED_LEAVE_TYPES,
    REASON_BOILERPLATE, REASON_TOPICS,
};

/// Leave details as read from text; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDetails {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub leave_type: Option<LeaveType>,
    pub reason: Option<String>,
    pub employee_name: Option<String>,
    pub duration_days: Option<f64>,
    pub is_half_day: bool,
    /// Date problems worth telling the user about. Absence of any date is
    /// not an error.
    pub errors: Vec<String>,
}

impl LeaveDetails {
    /// Nothing usable was found.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.leave_type.is_none()
            && self.reason.is_none()
            && self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WfhDetails {
    pub date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub employee_name: Option<String>,
    pub errors: Vec<String>,
}

impl WfhDetails {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.reason.is_none() && self.errors.is_empty()
    }
}

/// A yes/no answer to a pending confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    Yes,
    No,
}

// ============================================================================
// Patterns
// ============================================================================

static EXPLICIT_TYPE_PATTERNS: Lazy<Vec<(Regex, LeaveType)>> =
    Lazy::new(|| keyword_patterns(EXPLICIT_LEAVE_TYPES));

static INFERRED_TYPE_PATTERNS: Lazy<Vec<(Regex, LeaveType)>> =
    Lazy::new(|| keyword_patterns(INFERRED_LEAVE_TYPES));

static TOPIC_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    REASON_TOPICS
        .iter()
        .map(|(words, reason)| (word_pattern(words), *reason))
        .collect()
});

static BECAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bbecause\s+(?:of\s+)?(.+?)(?:[.?!]|$)").unwrap());

static FOR_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bfor\s+(.+?)(?:\s+(?:on|from|starting|beginning|since|till|until)\b|[.?!,;]|$)",
    )
    .unwrap()
});

/// Phrases removed from a reason before judging it: half days, day counts,
/// relative dates and calendar dates.
static REASON_NOISE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:an?\s+)?half(?:[- ]?a)?[- ]?days?\b",
        r"(?i)\b\d+(?:\.\d+)?\s*-?\s*days?\b",
        r"(?i)\b(?:next|this|coming)\s+(?:week|month|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        r"(?i)\b(?:day after tomorrow|tomorrow|today|yesterday|morning|afternoon)\b",
        r"(?i)\b\d{1,4}[./-]\d{1,2}(?:[./-]\d{2,4})?\b",
        r"(?i)\b\d{1,2}(?:st|nd|rd|th)?\b",
        r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\b",
        r"(?i)\b(?:work(?:ing)?\s+from\s+home)\b",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static BOILERPLATE: Lazy<Regex> = Lazy::new(|| word_pattern(REASON_BOILERPLATE));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static BARE_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").unwrap());

static EDIT: Lazy<Regex> = Lazy::new(|| word_pattern(EDIT_WORDS));

static EDIT_OF_REQUEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:edit|change|modify|update)\s*[.!]?\s*$",
        r"|\b(?:edit|change|modify|update|fix|correct)\s+(?:it|that|this|(?:the|my)\s+(?:last\s+)?(?:dates?|request|reason|type|leave\s+type|leave\s+request|wfh\s+request|application))\b",
        r"|\bthat'?s\s+wrong\b",
        r"|\bwrong\s+(?:dates?|type|reason)\b",
    ))
    .unwrap()
});

fn word_pattern(words: &[&str]) -> Regex {
    let alternatives = words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).unwrap()
}

fn keyword_patterns(table: &[(&str, LeaveType)]) -> Vec<(Regex, LeaveType)> {
    table
        .iter()
        .map(|(word, leave_type)| (word_pattern(&[word]), *leave_type))
        .collect()
}

// ============================================================================
// Extraction
// ============================================================================

/// Reads dates, duration, leave type and reason from one message.
///
/// When a day count is given (or the text names only a start), the end date
/// is projected from the count. A half day always collapses to a single day
/// of 0.5.
pub fn extract_leave_details(text: &str, today: NaiveDate) -> LeaveDetails {
    let dates = parse_dates(text, today);
    let duration = parse_duration(text);
    let errors = if dates.is_unrecognized() {
        Vec::new()
    } else {
        dedup(dates.errors.clone())
    };

    let start_date = dates.start_date;
    let mut end_date = dates.end_date;
    let mut duration_days = duration.duration_days;

    if let Some(start) = start_date {
        if duration.is_half_day {
            end_date = Some(start);
            duration_days = Some(0.5);
        } else {
            let projected = duration
                .duration_days
                .filter(|_| duration.has_explicit_duration || end_date.is_none());
            if let Some(days) = projected {
                end_date = Some(project_end_date(start, days));
            } else {
                let end = end_date.unwrap_or(start);
                end_date = Some(end);
                let span = calculate_inclusive_days(start, end, false);
                duration_days = (span > 0.0).then_some(span);
            }
        }
    }

    let details = LeaveDetails {
        start_date,
        end_date,
        leave_type: extract_leave_type(text),
        reason: extract_reason(text),
        employee_name: None,
        duration_days,
        is_half_day: duration.is_half_day,
        errors,
    };
    debug!(?details, "extracted leave details");
    details
}

/// Reads a single WFH date and a reason from one message.
pub fn extract_wfh_details(text: &str, today: NaiveDate) -> WfhDetails {
    let dates = parse_dates(text, today);
    let errors = if dates.is_unrecognized() {
        Vec::new()
    } else {
        dedup(dates.errors.clone())
    };

    WfhDetails {
        date: dates.start_date,
        reason: extract_reason(text),
        employee_name: None,
        errors,
    }
}

/// Explicit type names first, then inferred keywords.
pub fn extract_leave_type(text: &str) -> Option<LeaveType> {
    EXPLICIT_TYPE_PATTERNS
        .iter()
        .chain(INFERRED_TYPE_PATTERNS.iter())
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, leave_type)| *leave_type)
}

/// "because X", then each "for X" clause, then a topic keyword.
pub fn extract_reason(text: &str) -> Option<String> {
    let stated = BECAUSE
        .captures_iter(text)
        .chain(FOR_CLAUSE.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .find_map(|capture| clean_reason(capture.as_str()));
    if stated.is_some() {
        return stated;
    }

    TOPIC_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, reason)| reason.to_string())
}

fn clean_reason(raw: &str) -> Option<String> {
    let mut cleaned = raw.to_string();
    for pattern in REASON_NOISE.iter() {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }
    cleaned = BOILERPLATE.replace_all(&cleaned, " ").into_owned();
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = cleaned.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '-' | ';' | ':'));

    (cleaned.chars().count() >= 3).then(|| cleaned.to_string())
}

fn dedup(errors: Vec<String>) -> Vec<String> {
    let mut unique = Vec::with_capacity(errors.len());
    for error in errors {
        if !unique.contains(&error) {
            unique.push(error);
        }
    }
    unique
}

// ============================================================================
// Emails and control words
// ============================================================================

/// First email-looking token. A message that is nothing but an address
/// (even a malformed one) is returned whole so it can be rejected with a
/// specific message.
pub fn extract_email(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if BARE_ADDRESS.is_match(trimmed) {
        return Some(trimmed.to_string());
    }
    EMAIL.find(text).map(|found| found.as_str().to_string())
}

/// `local@domain`, compared case-insensitively.
pub fn is_company_email(email: &str, domain: &str) -> bool {
    let email = email.trim().to_lowercase();
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.chars().any(char::is_whitespace)
        && !host.contains('@')
        && host == domain.trim().to_lowercase()
}

/// A short reply that is a yes or a no ("yes please", "no thanks", "ok").
/// Anything after the yes/no word must be filler, so "ok casual leave
/// tomorrow" is a request rather than an answer.
pub fn extract_confirmation(text: &str) -> Option<Confirmation> {
    let cleaned: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'')
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 {
        return None;
    }
    let phrase = words.join(" ");

    CONFIRMATIONS
        .iter()
        .find(|(word, _)| {
            phrase == *word
                || phrase.strip_prefix(word).is_some_and(|rest| {
                    rest.starts_with(' ')
                        && rest
                            .split_whitespace()
                            .all(|filler| CONFIRMATION_FILLER.contains(&filler))
                })
        })
        .map(|(_, answer)| *answer)
}

pub fn is_confirmation(text: &str) -> bool {
    extract_confirmation(text).is_some()
}

pub fn is_rejection(text: &str) -> bool {
    extract_confirmation(text) == Some(Confirmation::No)
}

/// "edit", "change the date", "that's wrong"...
pub fn is_edit_request(text: &str) -> bool {
    EDIT.is_match(text)
}

/// Narrower than [`is_edit_request`]: the edit must point at a request
/// ("change it", "edit the request", "wrong dates"), since "leave tomorrow
/// to fix my car" is a new request once nothing is pending.
pub fn refers_back_to_request(text: &str) -> bool {
    EDIT_OF_REQUEST.is_match(text)
}
