/// Outbound client for the chat-completion API
///
/// The store's assistant is an external collaborator: one
/// `get_response(text) -> text` call per chat turn against an
/// OpenAI-compatible completion endpoint. Everything else about the
/// assistant (prompting, model choice) lives in configuration.

use serde_json::json;
use thiserror::Error;

use crate::config::AssistantConfig;

/// Instruction sent as the system message with every request
const SYSTEM_PROMPT: &str =
    "You are the game store's shopping assistant. Recommend only games that \
     are available in our catalog and keep answers short.";

/// Completion request cap
const MAX_TOKENS: u32 = 500;

/// Failures from the assistant client
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key configured; the endpoint is disabled
    #[error("assistant API key is not configured")]
    NotConfigured,

    /// Transport-level failure reaching the completion API
    #[error("assistant request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Completion API answered with a non-success status
    #[error("assistant API returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    /// Completion API answered 200 but without usable content
    #[error("assistant API response had no content")]
    EmptyResponse,
}

/// Chat-completion client
#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    config: AssistantConfig,
}

impl AssistantClient {
    /// Creates a client from configuration
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Forwards one user message and returns the assistant's reply text
    pub async fn get_response(&self, user_message: &str) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::NotConfigured)?;

        tracing::info!(model = %self.config.model, "Forwarding chat message to assistant");

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_message }
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": 0.7,
            "stream": false
        });

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "Assistant API returned an error status");
            return Err(AssistantError::UpstreamStatus(status));
        }

        let payload: serde_json::Value = response.json().await?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(AssistantError::EmptyResponse)?;

        tracing::debug!(reply_len = content.len(), "Assistant reply received");

        Ok(content)
    }
}
