//! Company holiday calendar.

pub mod model;
pub mod repository;

pub use model::{CalendarNotes, Holiday, HolidayCalendar};
pub use repository::HolidayRepository;
