//! Google Gemini implementation of the `AgentClient` port.
//!
//! Sends the conversation history to the `generateContent` endpoint and
//! turns the first candidate into an [`AgentReply`]. No tools are declared
//! to the model, so replies are normally plain text; a function call the
//! model emits anyway is surfaced as a tool call without being executed, and
//! tool results are always empty.

mod api;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use self::api::{GenerateContentResponse, build_request, extract_reply};
use crate::conversation::{
    domain::{AgentReply, HistoryEntry, UserId},
    ports::{AgentClient, AgentError, AgentResult},
};

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default base URL of the Gemini REST API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_PROMPT: &str = "You are a helpful assistant for a task management app. \
You cannot change the user's tasks yourself, so never claim to have added, edited, \
completed or removed one. Help the user plan and word their tasks, and answer \
briefly in plain language.";

/// Settings for [`GeminiAgentClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    /// API key; `None` makes every invocation fail with a configuration error.
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Agent client backed by the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiAgentClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiAgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAgentClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiAgentClient {
    /// Builds a client from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: GeminiSettings) -> AgentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AgentError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: settings.api_key.filter(|key| !key.trim().is_empty()),
            model: settings.model,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns `true` when an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl AgentClient for GeminiAgentClient {
    async fn process_message(
        &self,
        text: &str,
        history: &[HistoryEntry],
        user_id: &UserId,
    ) -> AgentResult<AgentReply> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::configuration("Gemini API key is not configured"))?;

        let request = build_request(SYSTEM_PROMPT, text, history);
        debug!(
            user_id = %user_id,
            model = %self.model,
            turns = request.contents.len(),
            "sending Gemini request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::invocation(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::invocation(format!("failed to read Gemini response: {e}")))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(AgentError::invocation(format!(
                "Gemini API returned {status}"
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AgentError::invocation(format!("malformed Gemini response: {e}")))?;

        if let Some(api_error) = parsed.error.as_ref() {
            error!(message = %api_error.message, "Gemini returned an error payload");
            return Err(AgentError::invocation(api_error.message.clone()));
        }

        let extracted = extract_reply(&parsed)
            .ok_or_else(|| AgentError::invocation("Gemini response contained no candidates"))?;

        let reply = extracted.tool_calls.into_iter().fold(
            extracted.text.map_or_else(AgentReply::empty, AgentReply::text),
            AgentReply::with_tool_call,
        );
        Ok(reply)
    }
}
