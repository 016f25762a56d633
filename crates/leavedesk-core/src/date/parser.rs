//! Single dates and ranges from free text.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";
const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const ORDINAL: &str = "(?:st|nd|rd|th)?";

/// Why a phrase could not be turned into a date.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("No text provided")]
    Empty,
    #[error("Unable to understand the requested date.")]
    Unrecognized,
    #[error("Invalid date in \"{0}\".")]
    InvalidDate(String),
    #[error("Invalid day for the specified month in \"{0}\".")]
    InvalidDayForMonth(String),
    #[error("Invalid ISO date provided.")]
    InvalidIso,
    #[error("Unable to parse start date.")]
    StartUnparsed,
    #[error("Unable to parse end date.")]
    EndUnparsed,
    #[error("End date cannot be earlier than start date.")]
    EndBeforeStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDateResult {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_range: bool,
    pub errors: Vec<String>,
}

impl ParsedDateResult {
    fn single(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            end_date: Some(date),
            is_range: false,
            errors: Vec::new(),
        }
    }

    fn failure(error: DateError) -> Self {
        Self {
            start_date: None,
            end_date: None,
            is_range: false,
            errors: vec![error.to_string()],
        }
    }

    /// A start date was found and nothing went wrong.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.start_date.is_some()
    }

    /// The text simply contained no date, as opposed to a malformed one.
    pub fn is_unrecognized(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.errors.len() == 1
            && self.errors[0] == DateError::Unrecognized.to_string()
    }
}

// ============================================================================
// Patterns (matched against lower-cased text)
// ============================================================================

static WORK_FROM_HOME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bwork(?:ing)?\s+from\s+home\b").unwrap());

static FROM_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfrom\s+(.+?)\s*(?:\b(?:to|till|until)\b|\s-\s)\s*(.+)$").unwrap()
});

static NUMERIC_RANGE: Lazy<Regex> = Lazy::new(|| {
    let date = r"\d{4}-\d{2}-\d{2}|\d{1,2}[./-]\d{1,2}(?:[./-]\d{4})?";
    Regex::new(&format!(
        r"\b({date})\s+(?:to|till|until|-)\s+({date})\b"
    ))
    .unwrap()
});

static SIMPLE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:^|\s)(\d{{1,2}}{ORDINAL}(?:\s+(?:of\s+)?(?:{MONTHS}))?)\s+(?:to|till|until|-)\s+(\d{{1,2}}{ORDINAL}(?:\s+(?:of\s+)?(?:this\s+month|next\s+month|{MONTHS}))?(?:\s+\d{{4}})?)\b"
    ))
    .unwrap()
});

static MONTH_OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(this|next)\s+month\b").unwrap());

static RELATIVE: Lazy<Vec<(Regex, i64)>> = Lazy::new(|| {
    [
        ("day after tomorrow", 2),
        ("tomorrow", 1),
        ("yesterday", -1),
        ("today", 0),
    ]
    .into_iter()
    .map(|(phrase, offset)| (Regex::new(&format!(r"\b{phrase}\b")).unwrap(), offset))
    .collect()
});

static QUALIFIED_WEEKDAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b(next|this|coming)\s+({WEEKDAYS})\b")).unwrap());

static BARE_WEEKDAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b({WEEKDAYS})\b")).unwrap());

static ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static NUMERIC_WITH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{4})\b").unwrap());

static NUMERIC_NO_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[./-](\d{1,2})\b").unwrap());

static DAY_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}}){ORDINAL}\s+(?:of\s+)?({MONTHS})\b(?:,?\s+(\d{{4}})\b)?"
    ))
    .unwrap()
});

static MONTH_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({MONTHS})\.?\s+(\d{{1,2}}){ORDINAL}\b(?:,?\s+(\d{{4}})\b)?"
    ))
    .unwrap()
});

static LONE_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b(\d{{1,2}}){ORDINAL}\b")).unwrap());

static BARE_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(?:the\s+)?(\d{{1,2}}){ORDINAL}$")).unwrap());

static MONTH_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"\b(?:{MONTHS})\b")).unwrap());

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());

static DATE_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\d|\b(?:{MONTHS}|{WEEKDAYS}|today|tomorrow|yesterday)\b"
    ))
    .unwrap()
});

const DURATION_UNITS: &[&str] = &["day", "week", "month", "year", "hour", "hr", "min", "time"];

// ============================================================================
// Public entry points
// ============================================================================

/// Parses a single date or a date range out of `text`.
///
/// Ranges ("from 15th to 17th", "20.12 - 22.12") are tried first, then a
/// single date: relative words, weekday expressions, absolute forms. All
/// relative forms resolve against `reference`.
pub fn parse_dates(text: &str, reference: NaiveDate) -> ParsedDateResult {
    let raw = text.trim();
    if raw.is_empty() {
        return ParsedDateResult::failure(DateError::Empty);
    }

    let lowered = raw.to_lowercase();
    let normalized = WORK_FROM_HOME.replace_all(&lowered, "wfh");

    if let Some(range) = parse_range(&normalized, reference) {
        debug!(?range, "parsed date range");
        return range;
    }

    match parse_single(&normalized, raw, reference) {
        Ok(Some(date)) => ParsedDateResult::single(date),
        Ok(None) => ParsedDateResult::failure(DateError::Unrecognized),
        Err(error) => ParsedDateResult::failure(error),
    }
}

/// Start date of `text` when it parses without errors.
pub fn parse_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let result = parse_dates(text, reference);
    if result.is_ok() { result.start_date } else { None }
}

/// `(start, end)` of `text` when it parses without errors.
pub fn parse_date_range(text: &str, reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let result = parse_dates(text, reference);
    if !result.is_ok() {
        return None;
    }
    let start = result.start_date?;
    Some((start, result.end_date.unwrap_or(start)))
}

// ============================================================================
// Ranges
// ============================================================================

fn parse_range(normalized: &str, reference: NaiveDate) -> Option<ParsedDateResult> {
    for pattern in [&*FROM_RANGE, &*NUMERIC_RANGE, &*SIMPLE_RANGE] {
        let Some(caps) = pattern.captures(normalized) else {
            continue;
        };
        let (Some(whole), Some(first), Some(second)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if followed_by_unit(&normalized[whole.end()..]) {
            continue;
        }
        let (first, second) = (first.as_str().trim(), second.as_str().trim());
        if !DATE_HINT.is_match(first) || !DATE_HINT.is_match(second) {
            continue;
        }
        return Some(assemble_range(first, second, reference));
    }
    None
}

fn assemble_range(first: &str, second: &str, reference: NaiveDate) -> ParsedDateResult {
    let mut errors = Vec::new();

    let mut start = match parse_boundary(first, reference) {
        Ok(Some(date)) => Some(date),
        Ok(None) => {
            errors.push(DateError::StartUnparsed);
            None
        }
        Err(error) => {
            errors.push(error);
            None
        }
    };
    let mut end = match parse_boundary(second, reference) {
        Ok(Some(date)) => Some(date),
        Ok(None) => {
            errors.push(DateError::EndUnparsed);
            None
        }
        Err(error) => {
            errors.push(error);
            None
        }
    };

    if let (Some(start_date), Some(end_date)) = (start, end) {
        let (start_date, end_date) = match share_end_month(first, second, end_date, reference) {
            Some(shared) => shared,
            None => (start_date, roll_forward(start_date, end_date, first, second)),
        };
        if end_date < start_date {
            errors.push(DateError::EndBeforeStart);
        }
        start = Some(start_date);
        end = Some(end_date);
    }

    ParsedDateResult {
        start_date: start,
        end_date: end,
        is_range: true,
        errors: errors.iter().map(ToString::to_string).collect(),
    }
}

/// "20th to 22nd january": a bare start day belongs to the month the end
/// names. A month name without a year that lies before the reference
/// month means next year's. Returns `None` when the start does not share
/// the end's month ("28th till 2nd next month").
fn share_end_month(
    first: &str,
    second: &str,
    end: NaiveDate,
    reference: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let day = BARE_DAY.captures(first)?;
    let names_month = MONTH_WORD.is_match(second);
    if !names_month && !MONTH_OFFSET.is_match(second) {
        return None;
    }

    let end_month = (end.year(), end.month());
    let end = if names_month
        && !YEAR.is_match(second)
        && end_month < (reference.year(), reference.month())
    {
        end.checked_add_months(Months::new(12))?
    } else {
        end
    };

    let start = build_date(end.year(), end.month(), parse_number(&day[1]), first).ok()?;
    (start <= end).then_some((start, end))
}

/// "20th december to 2nd january" crosses a year; "monday to friday" may
/// cross a week. Explicit years and "this/next month" never move.
fn roll_forward(start: NaiveDate, end: NaiveDate, first: &str, second: &str) -> NaiveDate {
    if end >= start || MONTH_OFFSET.is_match(second) || YEAR.is_match(second) {
        return end;
    }
    if MONTH_WORD.is_match(first) && MONTH_WORD.is_match(second) {
        return end
            .checked_add_months(Months::new(12))
            .filter(|next| *next >= start)
            .unwrap_or(end);
    }
    if BARE_WEEKDAY.is_match(second) && !QUALIFIED_WEEKDAY.is_match(second) {
        return end.checked_add_days(Days::new(7)).unwrap_or(end);
    }
    end
}

fn parse_boundary(segment: &str, reference: NaiveDate) -> Result<Option<NaiveDate>, DateError> {
    let segment = segment.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());

    if let Some(offset) = MONTH_OFFSET.captures(segment) {
        if let Some(day) = LONE_DAY.captures(segment) {
            let months = if &offset[1] == "next" { 1 } else { 0 };
            let first = reference
                .with_day(1)
                .and_then(|first| first.checked_add_months(Months::new(months)))
                .ok_or_else(|| DateError::InvalidDate(segment.to_string()))?;
            let day = parse_number(&day[1]);
            return build_date(first.year(), first.month(), day, segment).map(Some);
        }
    }

    parse_single(segment, segment, reference)
}

// ============================================================================
// Single dates
// ============================================================================

fn parse_single(
    normalized: &str,
    raw: &str,
    reference: NaiveDate,
) -> Result<Option<NaiveDate>, DateError> {
    if let Some(date) = parse_relative(normalized, reference) {
        return Ok(Some(date));
    }
    if let Some(date) = parse_weekday(normalized, reference) {
        return Ok(Some(date));
    }
    if let Some(date) = parse_absolute(normalized, raw, reference)? {
        return Ok(Some(date));
    }
    Ok(parse_bare_weekday(normalized, reference))
}

fn parse_relative(normalized: &str, reference: NaiveDate) -> Option<NaiveDate> {
    RELATIVE
        .iter()
        .find(|(pattern, _)| pattern.is_match(normalized))
        .and_then(|(_, offset)| shift(reference, *offset))
}

fn parse_weekday(normalized: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let caps = QUALIFIED_WEEKDAY.captures(normalized)?;
    let target: Weekday = caps[2].parse().ok()?;
    let today = i64::from(reference.weekday().num_days_from_monday());
    let wanted = i64::from(target.num_days_from_monday());

    let offset = match &caps[1] {
        "this" => (wanted - today).rem_euclid(7),
        "coming" => match (wanted - today).rem_euclid(7) {
            0 => 7,
            days => days,
        },
        // the named day of the following Monday-based week
        _ => 7 - today + wanted,
    };
    shift(reference, offset)
}

/// "on friday": the nearest such day, today included.
fn parse_bare_weekday(normalized: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let caps = BARE_WEEKDAY.captures(normalized)?;
    let target: Weekday = caps[1].parse().ok()?;
    let today = i64::from(reference.weekday().num_days_from_monday());
    let wanted = i64::from(target.num_days_from_monday());
    shift(reference, (wanted - today).rem_euclid(7))
}

fn parse_absolute(
    normalized: &str,
    raw: &str,
    reference: NaiveDate,
) -> Result<Option<NaiveDate>, DateError> {
    if let Some(caps) = ISO.captures(normalized) {
        let year = caps[1].parse::<i32>().map_err(|_| DateError::InvalidIso)?;
        let month = parse_number(&caps[2]);
        let day = parse_number(&caps[3]);
        return NaiveDate::from_ymd_opt(year, month, day)
            .map(Some)
            .ok_or(DateError::InvalidIso);
    }

    if let Some(caps) = NUMERIC_WITH_YEAR.captures(normalized) {
        let year = parse_year(&caps[3]).unwrap_or_else(|| reference.year());
        return build_date(year, parse_number(&caps[2]), parse_number(&caps[1]), raw).map(Some);
    }

    for caps in NUMERIC_NO_YEAR.captures_iter(normalized) {
        let Some(whole) = caps.get(0) else { continue };
        if continues_numeric(&normalized[whole.end()..]) {
            continue;
        }
        return build_date(
            reference.year(),
            parse_number(&caps[2]),
            parse_number(&caps[1]),
            raw,
        )
        .map(Some);
    }

    if let Some(caps) = DAY_FIRST.captures(normalized) {
        let year = caps
            .get(3)
            .and_then(|y| parse_year(y.as_str()))
            .unwrap_or_else(|| reference.year());
        return build_date(year, month_number(&caps[2]), parse_number(&caps[1]), raw).map(Some);
    }

    if let Some(caps) = MONTH_FIRST.captures(normalized) {
        let year = caps
            .get(3)
            .and_then(|y| parse_year(y.as_str()))
            .unwrap_or_else(|| reference.year());
        return build_date(year, month_number(&caps[1]), parse_number(&caps[2]), raw).map(Some);
    }

    for caps in LONE_DAY.captures_iter(normalized) {
        let Some(whole) = caps.get(0) else { continue };
        let rest = &normalized[whole.end()..];
        if followed_by_unit(rest) || continues_numeric(rest) {
            continue;
        }
        return build_date(
            reference.year(),
            reference.month(),
            parse_number(&caps[1]),
            raw,
        )
        .map(Some);
    }

    Ok(None)
}

// ============================================================================
// Helpers
// ============================================================================

fn build_date(year: i32, month: u32, day: u32, raw: &str) -> Result<NaiveDate, DateError> {
    if !(1..=12).contains(&month) {
        return Err(DateError::InvalidDate(raw.to_string()));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::InvalidDayForMonth(raw.to_string()))
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn parse_number(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

fn parse_year(digits: &str) -> Option<i32> {
    digits.parse().ok()
}

fn month_number(name: &str) -> u32 {
    match name.get(..3).unwrap_or(name) {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}

/// "5.12.2025" or "5:30": the digits belong to something larger.
fn continues_numeric(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.' | '/' | '-' | ':') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// "3 days", "2 weeks": a quantity, not a day of the month.
fn followed_by_unit(rest: &str) -> bool {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    DURATION_UNITS.iter().any(|unit| rest.starts_with(unit))
}
