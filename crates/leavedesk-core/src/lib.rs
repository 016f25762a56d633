pub mod assistant;
pub mod chat;
pub mod clock;
pub mod config;
pub mod date;
pub mod error;
pub mod extract;
pub mod holiday;
pub mod intent;
pub mod record;
pub mod request;
pub mod session;
pub mod validation;

// Re-export common error type
pub use error::{LeaveDeskError, Result};
