//! LLM provider layer for Oxiask.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — the `send(conversation) -> Message | Error`
//!   boundary the CLI depends on
//! - [`http_provider::HttpProvider`] — reqwest client for any
//!   OpenAI-compatible `/chat/completions` endpoint

pub mod http_provider;
pub mod traits;

// Re-export main types for convenience
pub use http_provider::HttpProvider;
pub use traits::{LlmProvider, LlmRequestConfig};
