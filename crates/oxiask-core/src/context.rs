//! The session context — which directory holds the transcripts and which
//! owner id names the active slot.
//!
//! Constructed once at startup and passed into every store/conversation
//! call. Nothing below this type reads the process environment, so tests
//! inject a tempdir and an arbitrary owner.

use std::path::{Path, PathBuf};

/// Fixed file-name prefix for all transcripts in the shared directory.
pub const TRANSCRIPT_PREFIX: &str = "oxiask_transcript-";

/// Where sessions live and which one is "ours".
///
/// Concurrent invocations from distinct parent processes get disjoint
/// owners, so they never contend on the active slot.
#[derive(Clone, Debug)]
pub struct SessionContext {
    /// Shared directory holding all transcript files.
    pub dir: PathBuf,
    /// Identifier of the owning process context (parent pid in production).
    pub owner: u32,
}

impl SessionContext {
    pub fn new(dir: impl Into<PathBuf>, owner: u32) -> Self {
        SessionContext {
            dir: dir.into(),
            owner,
        }
    }

    /// Production context: the system temp dir, keyed by the parent pid so
    /// each invoking shell keeps its own ongoing conversation.
    pub fn for_current_process() -> Self {
        SessionContext::new(std::env::temp_dir(), parent_pid())
    }

    /// Path of this process's active-session slot.
    pub fn active_path(&self) -> PathBuf {
        self.dir
            .join(format!("{TRANSCRIPT_PREFIX}{}", self.owner))
    }

    /// Whether `path` names a transcript under this context's convention.
    pub fn owns(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(TRANSCRIPT_PREFIX))
    }
}

#[cfg(unix)]
fn parent_pid() -> u32 {
    std::os::unix::process::parent_id()
}

#[cfg(not(unix))]
fn parent_pid() -> u32 {
    std::process::id()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
