//! Core types for Oxiask — the chat message model and the on-disk record shape.
//!
//! These types follow the OpenAI chat completions format. Message content is a
//! proper sum type: plain text or an ordered list of parts (text + image), so
//! the vision shape is handled by the type system instead of shape-sniffing
//! at render and transport time.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// A chat message. Each variant maps to a `role` field value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: MessageContent },

    #[serde(rename = "assistant")]
    Assistant { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message with text content.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a user message with multipart content (text + images).
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Message::User {
            content: MessageContent::Parts(parts),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
        }
    }

    /// The role tag as it appears on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::User { .. } => "user",
            Message::Assistant { .. } => "assistant",
        }
    }

    /// A plain-text rendering of the content, for previews and the
    /// transcript viewer. Multipart content renders its first text part.
    pub fn display_text(&self) -> &str {
        match self {
            Message::System { content } | Message::Assistant { content } => content,
            Message::User { content } => content.display_text(),
        }
    }
}

// ─────────────────────────────────────────────
// Message content (text or multipart/vision)
// ─────────────────────────────────────────────

/// User message content — either plain text or multipart (for vision).
///
/// When serialized: text becomes a plain string, parts become an array of
/// typed objects.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content (most common case).
    Text(String),
    /// Multipart content with text and/or images (for vision models).
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// First text part, or the text itself.
    pub fn display_text(&self) -> &str {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Parts(parts) => parts
                .iter()
                .find_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .unwrap_or(""),
        }
    }
}

/// A single part of a multipart message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// Text part.
    #[serde(rename = "text")]
    Text { text: String },
    /// Image URL part (a URL or a base64 data URI).
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

/// Image URL payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

// ─────────────────────────────────────────────
// Session record (on-disk shape)
// ─────────────────────────────────────────────

/// One persisted conversation: the model it runs against plus the ordered
/// message history. Serialized verbatim as the session file content.
///
/// Invariant: `messages[0]` is the instruction preamble; index 1, when
/// present, is the first user turn. Appends only: order is chronological
/// and never rewritten.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub model: String,
    pub messages: Vec<Message>,
}

impl SessionRecord {
    /// Create a record seeded with the instruction preamble.
    ///
    /// Reasoning-family models reject the `system` role, so the preamble is
    /// carried as a user message for those.
    pub fn seeded(model: impl Into<String>, preamble: impl Into<String>) -> Self {
        let model = model.into();
        let preamble = preamble.into();
        let first = if model_is_reasoning(&model) {
            Message::user(preamble)
        } else {
            Message::system(preamble)
        };
        SessionRecord {
            model,
            messages: vec![first],
        }
    }
}

/// Whether the model belongs to the `o1` reasoning family, which rejects
/// the `system` role and the sampling parameters.
pub fn model_is_reasoning(model: &str) -> bool {
    model.starts_with("o1-") || model == "o1"
}

// ─────────────────────────────────────────────
// Chat completion wire types
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Raw chat completion response. Used internally for deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantReply,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantReply {
    pub content: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_message_serialization() {
        let msg = Message::system("You are a helpful assistant.");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are a helpful assistant.");
    }

    #[test]
    fn test_user_text_message_serialization() {
        let msg = Message::user("Hello, world!");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello, world!");
    }

    #[test]
    fn test_user_multipart_message_serialization() {
        let msg = Message::user_parts(vec![
            ContentPart::Text {
                text: "What's in this image?".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/png;base64,abc123".to_string(),
                    detail: Some("high".to_string()),
                },
            },
        ]);
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        let content = json["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "What's in this image?");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,abc123");
        assert_eq!(content[1]["image_url"]["detail"], "high");
    }

    #[test]
    fn test_user_text_deserialization() {
        let json = json!({"role": "user", "content": "Hi there"});
        let msg: Message = serde_json::from_value(json).unwrap();

        match msg {
            Message::User {
                content: MessageContent::Text(text),
            } => assert_eq!(text, "Hi there"),
            _ => panic!("Expected User text message"),
        }
    }

    #[test]
    fn test_user_multipart_deserialization() {
        let json = json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "describe this"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,xyz", "detail": "high"}}
            ]
        });
        let msg: Message = serde_json::from_value(json).unwrap();

        match msg {
            Message::User {
                content: MessageContent::Parts(parts),
            } => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], ContentPart::Text { .. }));
            }
            _ => panic!("Expected multipart user message"),
        }
    }

    #[test]
    fn test_message_round_trip() {
        let messages = vec![
            Message::system("You are Oxiask."),
            Message::user("What is 2+2?"),
            Message::assistant("The answer is 4."),
        ];

        let json_str = serde_json::to_string(&messages).unwrap();
        let deserialized: Vec<Message> = serde_json::from_str(&json_str).unwrap();

        assert_eq!(messages, deserialized);
    }

    #[test]
    fn test_display_text_multipart() {
        let msg = Message::user_parts(vec![
            ContentPart::Text {
                text: "caption me".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/png;base64,zzz".to_string(),
                    detail: None,
                },
            },
        ]);
        assert_eq!(msg.display_text(), "caption me");
    }

    #[test]
    fn test_display_text_image_only() {
        let msg = Message::user_parts(vec![ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "data:image/png;base64,zzz".to_string(),
                detail: None,
            },
        }]);
        assert_eq!(msg.display_text(), "");
    }

    #[test]
    fn test_record_shape_on_disk() {
        let record = SessionRecord::seeded("gpt-4o", "Be concise.");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "Be concise.");
    }

    #[test]
    fn test_seeded_reasoning_model_uses_user_preamble() {
        let record = SessionRecord::seeded("o1-mini", "Be concise.");
        assert_eq!(record.messages[0].role(), "user");
    }

    #[test]
    fn test_model_is_reasoning() {
        assert!(model_is_reasoning("o1-mini"));
        assert!(model_is_reasoning("o1-preview"));
        assert!(model_is_reasoning("o1"));
        assert!(!model_is_reasoning("gpt-4o"));
        assert!(!model_is_reasoning("o100-fake"));
    }

    #[test]
    fn test_chat_request_omits_absent_params() {
        let request = ChatCompletionRequest {
            model: "o1-mini".to_string(),
            messages: vec![Message::user("Hello")],
            user: "oxiask".to_string(),
            max_tokens: None,
            temperature: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
        assert_eq!(json["user"], "oxiask");
    }

    #[test]
    fn test_chat_response_parsing() {
        let api_json = json!({
            "id": "chatcmpl-abc123",
            "choices": [{
                "message": { "role": "assistant", "content": "Hello! How can I help?" },
                "finish_reason": "stop"
            }]
        });

        let resp: ChatCompletionResponse = serde_json::from_value(api_json).unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(
            resp.choices[0].message.content.as_deref(),
            Some("Hello! How can I help?")
        );
    }
}
