//! OpenAiAssistant - general assistant over an OpenAI-compatible
//! Chat Completions endpoint (OpenAI, Groq and friends).
//!
//! The API key is read from the environment variable named in
//! [`AssistantConfig::api_key_env`].

use async_trait::async_trait;
use leavedesk_core::assistant::GeneralAssistant;
use leavedesk_core::config::AssistantConfig;
use leavedesk_core::error::{LeaveDeskError, Result};
use leavedesk_core::session::HistoryEntry;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, warn};

const COLLABORATOR: &str = "assistant";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.7;

/// General assistant that talks to an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAiAssistant {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    company_name: String,
    /// Policy text appended to the system prompt
    policy_context: Option<String>,
}

impl OpenAiAssistant {
    /// Creates an assistant for the OpenAI endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: None,
            company_name: "Winfomi".to_string(),
            policy_context: None,
        }
    }

    /// Builds an assistant from config, reading the key from the environment.
    ///
    /// # Returns
    ///
    /// - `Ok(assistant)`: Key present
    /// - `Err(LeaveDeskError::Config)`: The key variable is unset or empty
    pub fn try_from_config(config: &AssistantConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LeaveDeskError::config(format!(
                    "{} not found in environment variables",
                    config.api_key_env
                ))
            })?;

        let model = if config.model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.clone()
        };

        let mut assistant = Self::new(api_key, model).with_endpoint(&config.endpoint);
        assistant.max_tokens = config.max_tokens;
        Ok(assistant)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self
    }

    /// Adds policy text the model may quote from.
    pub fn with_policy_context(mut self, policy: impl Into<String>) -> Self {
        self.policy_context = Some(policy.into());
        self
    }

    fn system_prompt(&self, history: &[HistoryEntry]) -> String {
        let company = &self.company_name;
        let mut prompt = format!(
            "You are the {company} HR Assistant, helping employees with leave, holidays, \
             work from home and other HR questions.\n\n\
             Instructions:\n\
             - Be friendly, professional and concise (3-5 sentences for simple questions)\n\
             - Use bullet points for lists and policies\n\
             - If the employee wants to apply for leave or WFH, tell them to say so with a date, \
             e.g. \"casual leave tomorrow for fever\" or \"WFH on Friday\"\n\
             - Suggest \"leave balance\", \"holiday list\", \"leave policy\" or \"show my requests\" \
             when relevant"
        );

        if let Some(policy) = &self.policy_context {
            prompt.push_str("\n\nCompany policies:\n");
            prompt.push_str(policy);
        }

        if !history.is_empty() {
            prompt.push_str("\n\nConversation Context:\n");
            let context: Vec<String> = history
                .iter()
                .map(|entry| {
                    let intent = entry
                        .intent
                        .map(|intent| intent.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    format!("User: {}\nIntent: {intent}", entry.message)
                })
                .collect();
            prompt.push_str(&context.join("\n"));
        }

        prompt
    }

    fn build_request(&self, message: &str, history: &[HistoryEntry]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.system_prompt(history),
                },
                ChatMessage {
                    role: "user",
                    content: message.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            LeaveDeskError::collaborator(COLLABORATOR, format!("Failed to parse response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl GeneralAssistant for OpenAiAssistant {
    async fn answer(&self, message: &str, history: &[HistoryEntry]) -> Result<String> {
        debug!(model = %self.model, history = history.len(), "asking assistant");
        let request = self.build_request(message, history);
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn request_error(err: reqwest::Error) -> LeaveDeskError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "could not connect"
    } else {
        "failed"
    };
    LeaveDeskError::collaborator(COLLABORATOR, format!("request {kind}: {err}"))
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LeaveDeskError::collaborator(COLLABORATOR, "response had no content"))
}

fn map_http_error(status: StatusCode, body: &str) -> LeaveDeskError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );
    if is_retryable {
        warn!(status = status.as_u16(), "assistant endpoint temporarily unavailable");
    }

    LeaveDeskError::collaborator(
        COLLABORATOR,
        format!(
            "HTTP {}{}: {message}",
            status.as_u16(),
            if is_retryable { " (retryable)" } else { "" }
        ),
    )
}
