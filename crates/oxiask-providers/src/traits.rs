//! LLM provider trait — the seam between the CLI and the concrete backend.

use async_trait::async_trait;

use oxiask_core::config::ChatConfig;
use oxiask_core::types::{Message, SessionRecord};
use oxiask_core::Error;

/// Generation parameters passed to each call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.6,
        }
    }
}

impl From<&ChatConfig> for LlmRequestConfig {
    fn from(chat: &ChatConfig) -> Self {
        Self {
            max_tokens: chat.max_tokens,
            temperature: chat.temperature,
        }
    }
}

/// Trait the chat backend implements.
///
/// The request carries the record's full ordered message history; a
/// successful response yields exactly one assistant message for the caller
/// to append. Any failure (network, HTTP status, or a response that does
/// not match the expected shape) is reported as an error, never coerced
/// into a message.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the conversation and return the assistant's reply.
    async fn send(
        &self,
        record: &SessionRecord,
        config: &LlmRequestConfig,
    ) -> Result<Message, Error>;
}
