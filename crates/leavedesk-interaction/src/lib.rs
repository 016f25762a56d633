//! General-assistant implementations for LeaveDesk.
//!
//! Messages the conversation engine cannot map to a leave or WFH action are
//! answered by a [`GeneralAssistant`](leavedesk_core::assistant::GeneralAssistant):
//! either a language model behind an OpenAI-compatible endpoint or a fixed
//! table of offline answers.

pub mod canned;
pub mod openai_assistant;

pub use canned::CannedAssistant;
pub use openai_assistant::OpenAiAssistant;
