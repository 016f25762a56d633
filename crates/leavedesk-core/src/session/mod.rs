//! Conversational session state.

pub mod effect;
pub mod model;
pub mod store;

pub use effect::SessionEffect;
pub use model::{HistoryEntry, LeaveConflict, SessionContext, SessionLimits, SessionStats};
pub use store::SessionStore;
