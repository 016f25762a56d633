//! Runtime configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::session::SessionLimits;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LeaveDeskConfig {
    /// Company name used in prompts ("Please enter your Winfomi email").
    pub company_name: String,
    /// Only addresses in this domain can be verified.
    pub email_domain: String,
    pub max_email_attempts: u32,
    pub max_history: usize,
    pub session_timeout_minutes: i64,
    /// Accept leave that starts before today.
    pub allow_backdated_leave: bool,
    /// Reject WFH requests that fall on a company holiday.
    pub wfh_blocks_on_holidays: bool,
    /// Name recorded when a verified profile carries no display name.
    pub default_employee_name: String,
    pub holidays_file: Option<PathBuf>,
    /// JSON seed for the in-memory record store.
    pub seed_file: Option<PathBuf>,
    pub assistant: AssistantConfig,
}

impl Default for LeaveDeskConfig {
    fn default() -> Self {
        Self {
            company_name: "Winfomi".to_string(),
            email_domain: "winfomi.com".to_string(),
            max_email_attempts: 3,
            max_history: 10,
            session_timeout_minutes: 30,
            allow_backdated_leave: false,
            wfh_blocks_on_holidays: true,
            default_employee_name: "Current User".to_string(),
            holidays_file: None,
            seed_file: None,
            assistant: AssistantConfig::default(),
        }
    }
}

impl LeaveDeskConfig {
    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_history: self.max_history.max(1),
            max_email_attempts: self.max_email_attempts.max(1),
            timeout: chrono::Duration::minutes(self.session_timeout_minutes.max(1)),
        }
    }

    /// Example address shown in verification prompts.
    pub fn example_email(&self) -> String {
        format!("example@{}", self.email_domain)
    }
}

/// Settings for the general free-text assistant.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    /// OpenAI-compatible chat-completions endpoint.
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub max_tokens: Option<u32>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            max_tokens: Some(512),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: LeaveDeskConfig = toml::from_str(
            r#"
            company_name = "Acme"
            allow_backdated_leave = true

            [assistant]
            model = "small-model"
            "#,
        )
        .unwrap();

        assert_eq!(config.company_name, "Acme");
        assert!(config.allow_backdated_leave);
        assert_eq!(config.email_domain, "winfomi.com");
        assert_eq!(config.max_email_attempts, 3);
        assert_eq!(config.assistant.model, "small-model");
        assert_eq!(config.assistant.api_key_env, "GROQ_API_KEY");
    }

    #[test]
    fn limits_are_never_zero() {
        let config = LeaveDeskConfig {
            max_history: 0,
            max_email_attempts: 0,
            ..Default::default()
        };
        let limits = config.session_limits();
        assert_eq!(limits.max_history, 1);
        assert_eq!(limits.max_email_attempts, 1);
    }
}
