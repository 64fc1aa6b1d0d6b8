//! The active conversation — the session bound to the running process.
//!
//! Normal turns load it (or seed a fresh record), append messages, and
//! persist after every append. A corrupt active slot is a fatal error at
//! load time: stale state must be surfaced, never silently replaced.

use tracing::debug;

use crate::error::Error;
use crate::session::store::SessionStore;
use crate::types::{Message, SessionRecord};

/// The current session, used for normal ask/answer turns.
#[derive(Debug)]
pub struct ActiveConversation<'a> {
    store: &'a SessionStore,
    record: SessionRecord,
}

impl<'a> ActiveConversation<'a> {
    /// Parse the active slot if present, otherwise seed a new record with
    /// the instruction preamble.
    ///
    /// Parse failure propagates; there is no silent fallback to a fresh
    /// conversation over a corrupt one.
    pub fn load_or_create(
        store: &'a SessionStore,
        model: &str,
        preamble: &str,
    ) -> Result<Self, Error> {
        let path = store.active_path();
        let record = if path.exists() {
            let record = store.load(&path)?;
            debug!(messages = record.messages.len(), "resumed active session");
            record
        } else {
            debug!(model, "seeding new active session");
            SessionRecord::seeded(model, preamble)
        };

        Ok(ActiveConversation { store, record })
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    /// Append `message` and immediately persist the full record. Every
    /// successful append is durable before the next turn can begin.
    pub fn append_turn(&mut self, message: Message) -> Result<(), Error> {
        self.record.messages.push(message);
        self.store.save(&self.record, &self.store.active_path())
    }

    /// The most recent message.
    pub fn last_message(&self) -> Result<&Message, Error> {
        self.record.messages.last().ok_or(Error::EmptyConversation)
    }

    /// Delete the active-session slot. Idempotent: clearing an absent
    /// session is not an error.
    pub fn clear(store: &SessionStore) -> Result<(), Error> {
        store.delete(&store.active_path())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
