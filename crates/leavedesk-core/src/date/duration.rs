//! Day counts and half-day phrasing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DAY_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*-?\s*days?\b").unwrap());

/// "half day", "half-day", "halfday", "a half day", "half a day", "half days"
pub(crate) static HALF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:an?\s+)?half(?:[- ]?a)?[- ]?days?\b").unwrap());

static PART_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:morning|afternoon)\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationResult {
    pub duration_days: Option<f64>,
    pub is_half_day: bool,
    pub has_explicit_duration: bool,
}

/// Reads an explicit day count and half-day phrasing from `text`.
///
/// Half-day phrasing wins over any number ("half day, 3 days" is 0.5).
/// A bare "morning"/"afternoon" only means a half day when no day count
/// was given.
pub fn parse_duration(text: &str) -> DurationResult {
    let explicit = DAY_COUNT
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|days| days.is_finite() && *days > 0.0);

    let is_half_day =
        HALF_DAY.is_match(text) || (explicit.is_none() && PART_OF_DAY.is_match(text));

    if is_half_day {
        return DurationResult {
            duration_days: Some(0.5),
            is_half_day: true,
            has_explicit_duration: true,
        };
    }

    DurationResult {
        duration_days: explicit,
        is_half_day: false,
        has_explicit_duration: explicit.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_day_counts() {
        let result = parse_duration("I need 3 days off");
        assert_eq!(result.duration_days, Some(3.0));
        assert!(result.has_explicit_duration);
        assert!(!result.is_half_day);

        assert_eq!(parse_duration("20 days of casual leave").duration_days, Some(20.0));
        assert_eq!(parse_duration("1.5 days").duration_days, Some(1.5));
        assert_eq!(parse_duration("a 2-day trip").duration_days, Some(2.0));
    }

    #[test]
    fn zero_days_is_discarded() {
        let result = parse_duration("0 days");
        assert_eq!(result.duration_days, None);
        assert!(!result.has_explicit_duration);
    }

    #[test]
    fn half_day_variants() {
        for text in [
            "half day tomorrow",
            "half-day leave",
            "halfday on friday",
            "a half day please",
            "half a day off",
            "two half days",
        ] {
            let result = parse_duration(text);
            assert!(result.is_half_day, "{text}");
            assert_eq!(result.duration_days, Some(0.5), "{text}");
        }
    }

    #[test]
    fn half_day_overrides_number() {
        let result = parse_duration("half day, not 3 days");
        assert!(result.is_half_day);
        assert_eq!(result.duration_days, Some(0.5));
        assert!(result.has_explicit_duration);
    }

    #[test]
    fn afternoon_only_without_explicit_count() {
        assert!(parse_duration("leave tomorrow afternoon").is_half_day);
        let result = parse_duration("2 days starting monday morning");
        assert!(!result.is_half_day);
        assert_eq!(result.duration_days, Some(2.0));
    }

    #[test]
    fn nothing_found() {
        let result = parse_duration("leave tomorrow");
        assert_eq!(result.duration_days, None);
        assert!(!result.is_half_day);
        assert!(!result.has_explicit_duration);
    }
}
