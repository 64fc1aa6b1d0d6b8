//! Configuration schema.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case, converted via
//! `#[serde(rename_all = "camelCase")]`. Every section has defaults so a
//! missing or partial file still yields a usable config.

use serde::{Deserialize, Serialize};

/// Default instruction preamble seeded into every new conversation.
pub const DEFAULT_PREAMBLE: &str = "You are ChatConcise, a very advanced LLM designed for \
experienced users. As ChatConcise you oblige to adhere to the following directives UNLESS \
overridden by the user:\nBe concise, proactive, helpful and efficient. Do not say anything \
more than what needed, but also, DON'T BE LAZY. Provide ONLY code when an implementation is \
needed. DO NOT USE MARKDOWN.";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.oxiask/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub chat: ChatConfig,
    pub provider: ProviderConfig,
    pub viewer: ViewerConfig,
}

// ─────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────

/// Model and generation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Image detail level for vision requests ("high" or "low").
    pub vision_detail: String,
    /// Instruction preamble for new conversations.
    pub preamble: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "o1-mini".to_string(),
            max_tokens: 2048,
            temperature: 0.6,
            vision_detail: "high".to_string(),
            preamble: DEFAULT_PREAMBLE.to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────

/// Credentials and endpoint for the chat-completions service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for Bearer authentication.
    #[serde(default)]
    pub api_key: String,
    /// API base URL.
    pub api_base: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Viewer
// ─────────────────────────────────────────────

/// Transcript viewer settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Editor command for transcript viewing. Falls back to `$EDITOR`,
    /// then `more`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl ViewerConfig {
    /// Resolve the pager/editor command to spawn.
    pub fn resolve_editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.is_empty()))
            .unwrap_or_else(|| "more".to_string())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chat.model, "o1-mini");
        assert_eq!(config.chat.max_tokens, 2048);
        assert_eq!(config.chat.temperature, 0.6);
        assert_eq!(config.provider.api_base, "https://api.openai.com/v1");
        assert!(!config.provider.is_configured());
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["chat"].get("maxTokens").is_some());
        assert!(json["chat"].get("max_tokens").is_none());
        assert!(json["chat"].get("visionDetail").is_some());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"chat": {"model": "gpt-4o"}}"#).unwrap();
        assert_eq!(config.chat.model, "gpt-4o");
        assert_eq!(config.chat.max_tokens, 2048);
        assert_eq!(config.chat.preamble, DEFAULT_PREAMBLE);
    }

    #[test]
    fn test_resolve_editor_prefers_config() {
        let viewer = ViewerConfig {
            editor: Some("nvim".to_string()),
        };
        assert_eq!(viewer.resolve_editor(), "nvim");
    }
}
