//! Holiday repository trait.

use async_trait::async_trait;

use super::model::HolidayCalendar;
use crate::error::Result;

/// Source of the company holiday calendar.
#[async_trait]
pub trait HolidayRepository: Send + Sync {
    /// Loads the full calendar.
    ///
    /// # Returns
    ///
    /// - `Ok(calendar)`: Calendar loaded (possibly empty)
    /// - `Err(_)`: Calendar source unreadable or malformed
    async fn load_calendar(&self) -> Result<HolidayCalendar>;
}
