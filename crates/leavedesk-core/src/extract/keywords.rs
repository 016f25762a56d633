//! Keyword tables driving the extractor.
//!
//! Tables are scanned in order and the first hit wins.

use crate::request::LeaveType;

use super::Confirmation;

/// Leave types named outright. Checked before [`INFERRED_LEAVE_TYPES`] so
/// "casual leave for fever" stays casual.
pub(crate) const EXPLICIT_LEAVE_TYPES: &[(&str, LeaveType)] = &[
    ("annual", LeaveType::Annual),
    ("sick", LeaveType::Sick),
    ("casual", LeaveType::Casual),
    ("maternity", LeaveType::Maternity),
    ("paternity", LeaveType::Paternity),
];

pub(crate) const INFERRED_LEAVE_TYPES: &[(&str, LeaveType)] = &[
    ("vacation", LeaveType::Annual),
    ("holiday", LeaveType::Annual),
    ("travel", LeaveType::Annual),
    ("medical", LeaveType::Sick),
    ("fever", LeaveType::Sick),
    ("flu", LeaveType::Sick),
    ("ill", LeaveType::Sick),
    ("pregnancy", LeaveType::Maternity),
    ("pregnant", LeaveType::Maternity),
    ("baby", LeaveType::Paternity),
    ("newborn", LeaveType::Paternity),
    ("fatherhood", LeaveType::Paternity),
    ("wedding", LeaveType::Casual),
    ("marriage", LeaveType::Casual),
    ("family event", LeaveType::Casual),
    ("personal", LeaveType::Casual),
];

/// Canned reasons used when the message states none explicitly.
pub(crate) const REASON_TOPICS: &[(&[&str], &str)] = &[
    (
        &["sick", "fever", "flu", "ill", "medical", "doctor", "clinic", "hospital"],
        "Medical reasons",
    ),
    (&["wedding", "marriage", "ceremony", "family"], "Family event"),
    (&["travel", "vacation", "holiday", "trip"], "Travel"),
];

/// Words stripped from a captured reason.
pub(crate) const REASON_BOILERPLATE: &[&str] = &[
    "apply",
    "applying",
    "request",
    "requesting",
    "need",
    "want",
    "take",
    "because of",
    "because",
    "for",
    "leave",
    "leaves",
    "on",
    "from",
    "the",
    "of",
    "wfh",
    "annual",
    "sick",
    "casual",
    "maternity",
    "paternity",
];

pub(crate) const CONFIRMATIONS: &[(&str, Confirmation)] = &[
    ("yes", Confirmation::Yes),
    ("y", Confirmation::Yes),
    ("yeah", Confirmation::Yes),
    ("yep", Confirmation::Yes),
    ("yup", Confirmation::Yes),
    ("sure", Confirmation::Yes),
    ("ok", Confirmation::Yes),
    ("okay", Confirmation::Yes),
    ("confirm", Confirmation::Yes),
    ("confirmed", Confirmation::Yes),
    ("correct", Confirmation::Yes),
    ("go ahead", Confirmation::Yes),
    ("proceed", Confirmation::Yes),
    ("submit", Confirmation::Yes),
    ("please do", Confirmation::Yes),
    ("no", Confirmation::No),
    ("n", Confirmation::No),
    ("nope", Confirmation::No),
    ("nah", Confirmation::No),
    ("cancel", Confirmation::No),
    ("stop", Confirmation::No),
    ("don't", Confirmation::No),
    ("dont", Confirmation::No),
    ("abort", Confirmation::No),
    ("discard", Confirmation::No),
    ("never mind", Confirmation::No),
];

/// Words that may trail a yes or a no without turning it into a request.
pub(crate) const CONFIRMATION_FILLER: &[&str] = &[
    "please", "pls", "thanks", "thank", "you", "go", "ahead", "do", "it", "that", "this", "is",
    "fine", "good", "great", "perfect", "correct", "right", "sure", "yes", "ok", "okay", "sounds",
    "looks", "all", "confirm", "submit", "proceed", "cancel", "i", "don't", "dont", "want", "mind",
];

pub(crate) const EDIT_WORDS: &[&str] = &["edit", "change", "modify", "update", "correct it", "wrong", "fix"];
