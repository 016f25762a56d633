//! Natural-language date and duration parsing.
//!
//! [`parse_dates`] turns phrases such as "next Friday", "15th to 17th of
//! this month" or "20.12.2025" into calendar dates relative to a reference
//! day. [`parse_duration`] reads day counts and half-day phrasing
//! independently of any date.

mod calendar;
mod duration;
mod parser;

pub use calendar::{calculate_inclusive_days, format_human_readable, is_past_date, project_end_date};
pub use duration::{DurationResult, parse_duration};
pub use parser::{DateError, ParsedDateResult, parse_date, parse_date_range, parse_dates};
