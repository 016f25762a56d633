//! Business rules gating a request.

mod rules;

pub use rules::{RuleViolation, check_balance, check_holidays, check_not_past, check_overlap};
