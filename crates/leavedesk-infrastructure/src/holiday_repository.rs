//! Holiday calendar sources.

use async_trait::async_trait;
use leavedesk_core::error::Result;
use leavedesk_core::holiday::{HolidayCalendar, HolidayRepository};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Calendar shipped with the binary.
const BUNDLED_CALENDAR: &str = include_str!("../data/holidays.json");

/// Reads the calendar from a JSON file on every call, so edits to the file
/// take effect without a restart.
#[derive(Debug, Clone)]
pub struct JsonHolidayRepository {
    path: PathBuf,
}

impl JsonHolidayRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HolidayRepository for JsonHolidayRepository {
    async fn load_calendar(&self) -> Result<HolidayCalendar> {
        debug!(path = %self.path.display(), "reading holiday calendar");
        let content = tokio::fs::read_to_string(&self.path).await?;
        let calendar: HolidayCalendar = serde_json::from_str(&content)?;
        Ok(calendar)
    }
}

/// A fixed calendar held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHolidayRepository {
    calendar: HolidayCalendar,
}

impl InMemoryHolidayRepository {
    pub fn new(calendar: HolidayCalendar) -> Self {
        Self { calendar }
    }

    /// Parses a calendar document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// The default company calendar.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CALENDAR)
    }
}

#[async_trait]
impl HolidayRepository for InMemoryHolidayRepository {
    async fn load_calendar(&self) -> Result<HolidayCalendar> {
        Ok(self.calendar.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[tokio::test]
    async fn bundled_calendar_has_christmas() {
        let calendar = InMemoryHolidayRepository::bundled()
            .unwrap()
            .load_calendar()
            .await
            .unwrap();

        let christmas = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(calendar.on(christmas).map(|h| h.name.as_str()), Some("Christmas"));
        assert_eq!(calendar.company_name.as_deref(), Some("Winfomi"));
        assert!(calendar.notes.weekends.is_some());
    }

    #[tokio::test]
    async fn json_file_is_reread() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holidays.json");
        std::fs::write(
            &path,
            r#"{ "holidays": [{ "date": "2025-12-25", "name": "Christmas" }] }"#,
        )
        .unwrap();

        let repository = JsonHolidayRepository::new(&path);
        assert_eq!(repository.load_calendar().await.unwrap().holidays.len(), 1);

        std::fs::write(&path, r#"{ "holidays": [] }"#).unwrap();
        assert!(repository.load_calendar().await.unwrap().holidays.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repository = JsonHolidayRepository::new(dir.path().join("absent.json"));
        let err = repository.load_calendar().await.unwrap_err();
        assert!(err.is_not_found_or_missing());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holidays.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonHolidayRepository::new(&path).load_calendar().await.is_err());
    }
}
