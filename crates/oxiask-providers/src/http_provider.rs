//! HTTP client for OpenAI-compatible `/chat/completions` endpoints.
//!
//! Transport failures, non-2xx statuses, and response-shape mismatches all
//! surface as [`Error::Transport`] carrying the raw diagnostic. The caller
//! decides what to persist, and a failed turn leaves history untouched.

use async_trait::async_trait;
use tracing::{debug, error};

use oxiask_core::config::ProviderConfig;
use oxiask_core::types::{
    model_is_reasoning, ChatCompletionRequest, ChatCompletionResponse, Message, SessionRecord,
};
use oxiask_core::Error;

use crate::traits::{LlmProvider, LlmRequestConfig};

/// Client identifier sent in the request's `user` field.
const REQUEST_USER: &str = "oxiask";

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A chat client talking to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HttpProvider {
    /// Create a provider from credentials.
    ///
    /// A missing API key is a configuration error, raised here so it aborts
    /// before any session mutation.
    pub fn new(config: &ProviderConfig) -> Result<Self, Error> {
        if !config.is_configured() {
            return Err(Error::configuration(
                "Missing API key! Set provider.apiKey in the config (or OPENAI_API_KEY) and try again.",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Ok(HttpProvider {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

/// Assemble the request body for `record`.
///
/// Reasoning-family models reject `max_tokens` and `temperature`, so those
/// are omitted for them.
fn build_request(record: &SessionRecord, config: &LlmRequestConfig) -> ChatCompletionRequest {
    let sampling = !model_is_reasoning(&record.model);
    ChatCompletionRequest {
        model: record.model.clone(),
        messages: record.messages.clone(),
        user: REQUEST_USER.to_string(),
        max_tokens: sampling.then_some(config.max_tokens),
        temperature: sampling.then_some(config.temperature),
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn send(
        &self,
        record: &SessionRecord,
        config: &LlmRequestConfig,
    ) -> Result<Message, Error> {
        let request_body = build_request(record, config);
        let url = self.completions_url();

        debug!(
            model = %record.model,
            messages = record.messages.len(),
            "Calling chat completions"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                Error::transport(format!("HTTP request error: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            error!(status = %status, body = %body, "API error");
            return Err(Error::transport(format!("{status} — {body}")));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse chat response");
            Error::transport(format!(
                "Error processing API return ({e}). Full response ahead:\n{body}"
            ))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                Error::transport(format!(
                    "Response carried no assistant message. Full response ahead:\n{body}"
                ))
            })?;

        debug!(chars = content.len(), "assistant reply received");
        Ok(Message::assistant(content))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
