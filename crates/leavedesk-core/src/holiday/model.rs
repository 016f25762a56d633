//! Holiday calendar model.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One company holiday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    /// Free-form category such as "National" or "Festival".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// Free-text notes shown under the holiday list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarNotes {
    pub optional_holidays: Option<String>,
    pub working_days: Option<String>,
    pub weekends: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayCalendar {
    pub company_name: Option<String>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub notes: CalendarNotes,
}

impl HolidayCalendar {
    /// Holidays falling in the given month, in calendar order.
    pub fn in_month(&self, year: i32, month: u32) -> Vec<&Holiday> {
        let mut holidays: Vec<&Holiday> = self
            .holidays
            .iter()
            .filter(|holiday| holiday.date.year() == year && holiday.date.month() == month)
            .collect();
        holidays.sort_by_key(|holiday| holiday.date);
        holidays
    }

    pub fn on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|holiday| holiday.date == date)
    }
}
