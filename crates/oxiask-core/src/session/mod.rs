//! Session persistence — file-backed store + the process-bound active
//! conversation.
//!
//! # Disk format
//!
//! Each session is one JSON file in the shared context directory, named
//! `oxiask_transcript-{owner}`:
//! `{"model": "gpt-4o", "messages": [{"role": "system", "content": "..."}, ...]}`

pub mod active;
pub mod store;

pub use active::ActiveConversation;
pub use store::SessionStore;
