//! Application layer for LeaveDesk.
//!
//! Runs conversation turns against the domain: the state machine, its reply
//! texts, the in-memory session store and the chat use case tying them
//! together.

pub mod chat_service;
pub mod conversation;
pub mod session;

pub use chat_service::ChatService;
pub use conversation::{ConversationMachine, ConversationState, TurnOutcome};
pub use session::SessionCache;
