//! Infrastructure layer for LeaveDesk.
//!
//! Concrete implementations of the collaborator traits defined in
//! `leavedesk-core`: the in-memory record store, holiday calendars read from
//! JSON, and the TOML configuration service.

pub mod config_service;
pub mod holiday_repository;
pub mod paths;
pub mod record_store;

pub use config_service::ConfigService;
pub use holiday_repository::{InMemoryHolidayRepository, JsonHolidayRepository};
pub use paths::{LeaveDeskPaths, PathError};
pub use record_store::{InMemoryRecordStore, StoreSeed};
