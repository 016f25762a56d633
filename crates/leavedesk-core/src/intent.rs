//! Table-driven intent classification.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::debug;

/// What the employee is trying to do with a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    ApplyLeave,
    ApplyWfh,
    HolidayList,
    LeavePolicy,
    WfhPolicy,
    ListRequests,
    LeaveBalance,
    GeneralQuery,
}

/// A rule fires when every group has at least one phrase in the message
/// and none of `excludes` appears.
struct IntentRule {
    intent: Intent,
    groups: &'static [&'static [&'static str]],
    excludes: &'static [&'static str],
}

const WFH_WORDS: &[&str] = &["wfh", "work from home", "working from home", "remote work"];

const LEAVE_WORDS: &[&str] = &["leave", "holiday", "day off", "time off"];

const POLICY_QUESTIONS: &[&str] = &[
    "policy",
    "policies",
    "what is",
    "explain",
    "tell me about",
    "how many",
    "rules",
];

const BALANCE_WORDS: &[&str] = &[
    "balance",
    "remaining",
    "how many",
    "left",
    "available",
    "check leave",
    "leave status",
];

const APPLICATION_WORDS: &[&str] = &[
    "apply",
    "want",
    "need",
    "i have",
    "already have",
    "give me",
    "get me",
    "take",
    "request",
    "book",
    "yesterday",
    "today",
    "tomorrow",
];

/// Evaluated top to bottom; the first matching rule wins.
const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::ListRequests,
        groups: &[
            &["show", "list", "view", "display", "my", "see", "check"],
            &["requests", "applications"],
        ],
        excludes: &[],
    },
    IntentRule {
        intent: Intent::WfhPolicy,
        groups: &[WFH_WORDS, POLICY_QUESTIONS],
        excludes: &[],
    },
    IntentRule {
        intent: Intent::ApplyWfh,
        groups: &[WFH_WORDS],
        excludes: &[],
    },
    IntentRule {
        intent: Intent::HolidayList,
        groups: &[
            &["holiday"],
            &["list", "calendar", "show", "upcoming", "which", "holidays this"],
        ],
        excludes: &[],
    },
    IntentRule {
        intent: Intent::LeaveBalance,
        groups: &[&["leave"], BALANCE_WORDS],
        excludes: &[],
    },
    IntentRule {
        intent: Intent::LeavePolicy,
        groups: &[&["leave"], POLICY_QUESTIONS],
        excludes: &[],
    },
];

static DATE_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:on|from|for)\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|\d{1,2})|\d{1,2}(?:st|nd|rd|th)\b|\d{1,2}[./-]\d{1,2}|\b(?:next|this|coming)\s+(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|week)\b",
    )
    .unwrap()
});

impl IntentRule {
    fn matches(&self, lowered: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|phrase| lowered.contains(phrase)))
            && !self.excludes.iter().any(|phrase| lowered.contains(phrase))
    }
}

/// Classifies a message. Falls back to [`Intent::GeneralQuery`].
pub fn detect_intent(message: &str) -> Intent {
    let lowered = message.to_lowercase();

    let intent = RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.intent)
        .unwrap_or_else(|| {
            if is_leave_application(&lowered) {
                Intent::ApplyLeave
            } else {
                Intent::GeneralQuery
            }
        });

    debug!(%intent, "detected intent");
    intent
}

/// Leave keyword plus either an application verb or something date-shaped.
fn is_leave_application(lowered: &str) -> bool {
    mentions_leave(lowered)
        && (APPLICATION_WORDS.iter().any(|word| lowered.contains(word))
            || DATE_SIGNAL.is_match(lowered))
}

/// The message talks about leave at all.
pub fn mentions_leave(text: &str) -> bool {
    let lowered = text.to_lowercase();
    LEAVE_WORDS.iter().any(|word| lowered.contains(word))
}

pub fn mentions_wfh(text: &str) -> bool {
    let lowered = text.to_lowercase();
    WFH_WORDS.iter().any(|word| lowered.contains(word))
}
