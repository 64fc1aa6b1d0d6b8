//! File-backed session store.
//!
//! One JSON file per session in the context directory, named
//! `oxiask_transcript-{owner}`. Content is the serialized [`SessionRecord`]
//! (`{"model": ..., "messages": [...]}`).
//!
//! Saves are full-file rewrites staged through a dot-prefixed temp file and
//! renamed into place, so a reader never observes a partially written
//! record. A crash mid-write leaves either the old record or a stray temp
//! file, never a truncated transcript.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::SessionContext;
use crate::error::Error;
use crate::types::SessionRecord;

/// Enumerates, loads, saves, and deletes session records on disk.
#[derive(Debug)]
pub struct SessionStore {
    ctx: SessionContext,
}

impl SessionStore {
    /// Create a store over `ctx`, making sure the directory exists.
    pub fn new(ctx: SessionContext) -> Result<Self, Error> {
        std::fs::create_dir_all(&ctx.dir).map_err(|e| Error::storage(&ctx.dir, e))?;
        Ok(SessionStore { ctx })
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Path of the active-session slot for this store's context.
    pub fn active_path(&self) -> PathBuf {
        self.ctx.active_path()
    }

    /// All transcript files currently present, in storage-enumeration order.
    ///
    /// The order is whatever the directory iteration yields; callers must
    /// not assume it is chronological.
    pub fn list(&self) -> Result<Vec<PathBuf>, Error> {
        let entries =
            std::fs::read_dir(&self.ctx.dir).map_err(|e| Error::storage(&self.ctx.dir, e))?;

        let mut paths = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if self.ctx.owns(&path) {
                paths.push(path);
            }
        }
        debug!(count = paths.len(), "enumerated sessions");
        Ok(paths)
    }

    /// Load the record stored at `path`.
    ///
    /// Unparsable content surfaces as [`Error::CorruptSession`], never as a
    /// truncated partial record.
    pub fn load(&self, path: &Path) -> Result<SessionRecord, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::storage(path, e))?;
        serde_json::from_str(&content).map_err(|source| Error::CorruptSession {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overwrite the record at `path`.
    ///
    /// Writes to a sibling temp file and renames it over the target, so the
    /// swap is atomic from a reader's perspective.
    pub fn save(&self, record: &SessionRecord, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string(record).map_err(|source| Error::CorruptSession {
            path: path.to_path_buf(),
            source,
        })?;

        let tmp = staging_path(path);
        std::fs::write(&tmp, json).map_err(|e| Error::storage(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| {
            // Leave no stray staging file behind on a failed swap.
            let _ = std::fs::remove_file(&tmp);
            Error::storage(path, e)
        })?;

        debug!(path = %path.display(), messages = record.messages.len(), "saved session");
        Ok(())
    }

    /// Remove the record at `path`. Removing an already-absent record is Ok;
    /// a denied removal surfaces as [`Error::Permission`] for the caller to
    /// log and survive.
    pub fn delete(&self, path: &Path) -> Result<(), Error> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted session");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to delete session");
                Err(Error::storage(path, e))
            }
        }
    }

    /// Copy the record at `path` into this context's active slot, replacing
    /// any existing active session unconditionally.
    ///
    /// The source is parsed first, so promoting a corrupt record reports it
    /// instead of planting corrupt active state.
    pub fn promote(&self, path: &Path) -> Result<(), Error> {
        let record = self.load(path)?;
        self.save(&record, &self.active_path())?;
        debug!(from = %path.display(), "promoted session to active slot");
        Ok(())
    }
}

/// Sibling staging path for atomic writes. The dot prefix keeps it outside
/// the transcript naming convention, so `list()` never reports it.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("session");
    target.with_file_name(format!(".{name}.tmp"))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
