//! Committed records and the store behind them.

pub mod model;
pub mod store;

pub use model::{EmployeeProfile, LeaveBalance, RecordStatus, RequestRecord};
pub use store::RecordStore;
