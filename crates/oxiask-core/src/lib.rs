//! Oxiask core — types, errors, session persistence, and configuration.
//!
//! This crate contains:
//! - **types**: chat messages, multipart content, and the on-disk record shape
//! - **session**: file-backed session store + the process-bound active conversation
//! - **context**: the explicit session context (directory + owner) threaded
//!   through every storage call
//! - **config**: JSON config file with env var overrides

pub mod config;
pub mod context;
pub mod error;
pub mod session;
pub mod types;
pub mod utils;

pub use context::SessionContext;
pub use error::Error;
pub use session::{ActiveConversation, SessionStore};
pub use types::{ContentPart, Message, MessageContent, SessionRecord};
