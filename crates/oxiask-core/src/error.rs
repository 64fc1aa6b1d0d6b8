//! Error taxonomy for Oxiask.
//!
//! The variants map to how each failure is handled at the surface:
//! `Configuration` and `EmptyConversation` abort before/without mutating any
//! session; `CorruptSession` is fatal for the affected record only;
//! `Permission` is non-fatal in interactive contexts (logged, loop continues)
//! but fatal during the mandatory post-turn save; `Transport` is reported
//! with the raw diagnostic and leaves history untouched.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing credential or unsupported OS/display combination.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A stored record could not be parsed into the expected shape.
    #[error("corrupt session file {}: {source}", .path.display())]
    CorruptSession {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Storage denied a write or removal.
    #[error("permission denied for {}: {source}", .path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other storage failure.
    #[error("storage error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record had no messages, violating the preamble invariant.
    #[error("conversation has no messages")]
    EmptyConversation,

    /// Network or service failure, carrying the raw diagnostic.
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Wrap an I/O error for `path`, distinguishing permission denials.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Error::Permission { path, source }
        } else {
            Error::Io { path, source }
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport(message.into())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
