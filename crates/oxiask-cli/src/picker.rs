//! Interactive session picker — a single-selection list over the saved
//! transcripts.
//!
//! The state machine is pure (command in, action out) so navigation and
//! selection repair are testable without a terminal; the `run` driver owns
//! the raw-mode input stream, the rendering, and the store calls.

use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tracing::warn;

use oxiask_core::{utils, Error, SessionStore};

use crate::input::{KeyCommand, KeyInput};

/// Each candidate's first-line preview is truncated to this many chars.
const PREVIEW_WIDTH: usize = 64;

const HELP_LINE: &str = "RETURN - Select | D - Delete | CTRL+C - Quit";

/// What the state machine asks the driver to do for a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerAction {
    /// Nothing to do; selection may have moved.
    None,
    /// Promote this session to the active slot and stop.
    Promote(PathBuf),
    /// Delete this session from storage.
    Delete(PathBuf),
    /// Stop with no further persistence.
    Cancel,
}

/// Picker state after a list mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerState {
    Browsing,
    Empty,
}

/// How an interactive session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerOutcome {
    Promoted,
    Cancelled,
    Emptied,
}

// ─────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────

/// Ordered candidate sessions plus the current selection.
///
/// Whenever the list is non-empty, exactly one entry is selected.
pub struct SessionPicker {
    candidates: Vec<PathBuf>,
    selected: usize,
}

impl SessionPicker {
    /// Build a picker over `candidates` (storage-enumeration order), with
    /// the first entry selected.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        SessionPicker {
            candidates,
            selected: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Interpret one command against the current state.
    ///
    /// In the `Empty` state only `Interrupt` does anything; no command may
    /// trigger further store operations.
    pub fn apply(&mut self, cmd: &KeyCommand) -> PickerAction {
        if self.candidates.is_empty() {
            return match cmd {
                KeyCommand::Interrupt => PickerAction::Cancel,
                _ => PickerAction::None,
            };
        }

        match cmd {
            KeyCommand::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
                PickerAction::None
            }
            KeyCommand::Down => {
                if self.selected + 1 < self.candidates.len() {
                    self.selected += 1;
                }
                PickerAction::None
            }
            KeyCommand::Enter => PickerAction::Promote(self.candidates[self.selected].clone()),
            KeyCommand::Delete => PickerAction::Delete(self.candidates[self.selected].clone()),
            KeyCommand::Interrupt => PickerAction::Cancel,
            KeyCommand::Literal(_) => PickerAction::None,
        }
    }

    /// Drop the selected entry after a successful store delete, repairing
    /// the selection: the entry at the same index if one exists, else the
    /// previous one.
    pub fn remove_selected(&mut self) -> PickerState {
        if self.candidates.is_empty() {
            return PickerState::Empty;
        }

        self.candidates.remove(self.selected);
        if self.candidates.is_empty() {
            return PickerState::Empty;
        }
        if self.selected >= self.candidates.len() {
            self.selected = self.candidates.len() - 1;
        }
        PickerState::Browsing
    }
}

// ─────────────────────────────────────────────
// Interactive driver
// ─────────────────────────────────────────────

/// Run the interactive loop over the store's current sessions.
pub fn run(store: &SessionStore) -> anyhow::Result<PickerOutcome> {
    let mut picker = SessionPicker::new(store.list()?);
    if picker.is_empty() {
        println!("No conversations to manage!");
        return Ok(PickerOutcome::Emptied);
    }

    let outcome = {
        // Raw mode is scoped to the loop; dropped (and restored) on every
        // way out of this block, including `?`.
        let mut input = KeyInput::new()?;
        let mut out = io::stdout();

        loop {
            render(&picker, store, &mut out)?;

            match picker.apply(&input.next_command()?) {
                PickerAction::None => {}
                PickerAction::Promote(path) => {
                    store.promote(&path)?;
                    break PickerOutcome::Promoted;
                }
                PickerAction::Delete(path) => match store.delete(&path) {
                    Ok(()) => {
                        if picker.remove_selected() == PickerState::Empty {
                            break PickerOutcome::Emptied;
                        }
                    }
                    // The entry stays in the list: storage still holds it,
                    // and the list must not drift from storage.
                    Err(Error::Permission { .. }) => {
                        warn!(path = %path.display(), "delete denied, keeping entry");
                    }
                    Err(e) => return Err(e.into()),
                },
                PickerAction::Cancel => break PickerOutcome::Cancelled,
            }
        }
    };

    if outcome == PickerOutcome::Emptied {
        clear_screen()?;
        println!("No conversations to manage!");
    }
    Ok(outcome)
}

/// One render cycle: clear, help line, then every candidate with its
/// preview, the selected one in the reverse-video accent.
fn render(picker: &SessionPicker, store: &SessionStore, out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    // Raw mode leaves output post-processing off, so lines end with \r\n.
    write!(out, "{HELP_LINE}\r\n")?;

    for (i, path) in picker.candidates().iter().enumerate() {
        let line = format!("{} => {}", path.display(), preview_line(store, path));
        if i == picker.selected_index() {
            write!(out, "{}\r\n", line.black().on_green())?;
        } else {
            write!(out, "{line}\r\n")?;
        }
    }
    out.flush()
}

/// First line of the candidate's first user turn, truncated to the preview
/// width. An unparsable sibling renders a placeholder instead of aborting
/// the picker.
fn preview_line(store: &SessionStore, path: &std::path::Path) -> String {
    match store.load(path) {
        Ok(record) => {
            let message = record.messages.get(1).or_else(|| record.messages.first());
            let text = message.map(|m| m.display_text()).unwrap_or("");
            utils::truncate_string(utils::first_line(text), PREVIEW_WIDTH)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable session in picker");
            "(unreadable session)".to_string()
        }
    }
}

fn clear_screen() -> io::Result<()> {
    let mut out = io::stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use oxiask_core::types::{Message, SessionRecord};
    use oxiask_core::SessionContext;
    use tempfile::tempdir;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n)
            .map(|i| PathBuf::from(format!("/tmp/oxiask_transcript-{i}")))
            .collect()
    }

    #[test]
    fn first_entry_selected_initially() {
        let picker = SessionPicker::new(paths(3));
        assert_eq!(picker.selected_index(), 0);
    }

    #[test]
    fn up_down_clamp_without_wrapping() {
        let mut picker = SessionPicker::new(paths(3));

        // Net moves from index i always land on clamp(i + net, 0, n-1).
        let moves = [
            KeyCommand::Up,
            KeyCommand::Up,
            KeyCommand::Down,
            KeyCommand::Down,
            KeyCommand::Down,
            KeyCommand::Down,
            KeyCommand::Down,
        ];
        let mut expected: i64 = 0;
        for cmd in &moves {
            assert_eq!(picker.apply(cmd), PickerAction::None);
            expected += match cmd {
                KeyCommand::Up => -1,
                KeyCommand::Down => 1,
                _ => 0,
            };
            let clamped = expected.clamp(0, 2) as usize;
            expected = clamped as i64;
            assert_eq!(picker.selected_index(), clamped);
        }
        assert_eq!(picker.selected_index(), 2);
    }

    #[test]
    fn literal_input_does_not_move_selection() {
        let mut picker = SessionPicker::new(paths(2));
        picker.apply(&KeyCommand::Down);
        assert_eq!(
            picker.apply(&KeyCommand::Literal("x".to_string())),
            PickerAction::None
        );
        assert_eq!(picker.selected_index(), 1);
    }

    #[test]
    fn enter_promotes_selected_candidate() {
        let candidates = paths(3);
        let mut picker = SessionPicker::new(candidates.clone());

        // Scenario: A, B, C in storage order; Down, Down, Enter picks C.
        picker.apply(&KeyCommand::Down);
        picker.apply(&KeyCommand::Down);
        assert_eq!(
            picker.apply(&KeyCommand::Enter),
            PickerAction::Promote(candidates[2].clone())
        );
    }

    #[test]
    fn delete_targets_selected_candidate() {
        let candidates = paths(3);
        let mut picker = SessionPicker::new(candidates.clone());
        picker.apply(&KeyCommand::Down);
        assert_eq!(
            picker.apply(&KeyCommand::Delete),
            PickerAction::Delete(candidates[1].clone())
        );
    }

    #[test]
    fn remove_selected_keeps_exactly_one_selected() {
        // Remove from the middle: selection stays at the same index.
        let mut picker = SessionPicker::new(paths(3));
        picker.apply(&KeyCommand::Down);
        assert_eq!(picker.remove_selected(), PickerState::Browsing);
        assert_eq!(picker.candidates().len(), 2);
        assert_eq!(picker.selected_index(), 1);

        // Remove from the end: selection falls back to the previous entry.
        assert_eq!(picker.remove_selected(), PickerState::Browsing);
        assert_eq!(picker.candidates().len(), 1);
        assert_eq!(picker.selected_index(), 0);
    }

    #[test]
    fn removing_last_entry_empties_the_picker() {
        let mut picker = SessionPicker::new(paths(1));
        assert_eq!(picker.remove_selected(), PickerState::Empty);
        assert!(picker.is_empty());
    }

    #[test]
    fn empty_picker_runs_no_store_operations() {
        let mut picker = SessionPicker::new(Vec::new());

        assert_eq!(picker.apply(&KeyCommand::Up), PickerAction::None);
        assert_eq!(picker.apply(&KeyCommand::Down), PickerAction::None);
        assert_eq!(picker.apply(&KeyCommand::Enter), PickerAction::None);
        assert_eq!(picker.apply(&KeyCommand::Delete), PickerAction::None);
        assert_eq!(picker.apply(&KeyCommand::Interrupt), PickerAction::Cancel);
    }

    #[test]
    fn down_down_enter_promotes_third_stored_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(SessionContext::new(dir.path(), 1)).unwrap();

        let mut stored = Vec::new();
        for (i, question) in ["alpha", "beta", "gamma"].iter().enumerate() {
            let path = dir.path().join(format!("oxiask_transcript-{}", 100 + i));
            let mut record = SessionRecord::seeded("gpt-4o", "Be concise.");
            record.messages.push(Message::user(*question));
            store.save(&record, &path).unwrap();
            stored.push(path);
        }

        // Drive the state machine the way the interactive loop does.
        let mut picker = SessionPicker::new(stored.clone());
        picker.apply(&KeyCommand::Down);
        picker.apply(&KeyCommand::Down);
        match picker.apply(&KeyCommand::Enter) {
            PickerAction::Promote(path) => store.promote(&path).unwrap(),
            other => panic!("expected promote, got {other:?}"),
        }

        let active = store.load(&store.active_path()).unwrap();
        assert_eq!(active.messages[1], Message::user("gamma"));
    }

    #[test]
    fn preview_shows_first_user_turn() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(SessionContext::new(dir.path(), 1)).unwrap();
        let path = dir.path().join("oxiask_transcript-8");

        let mut record = SessionRecord::seeded("gpt-4o", "Be concise.");
        record
            .messages
            .push(Message::user("first question\nsecond line"));
        store.save(&record, &path).unwrap();

        assert_eq!(preview_line(&store, &path), "first question");
    }

    #[test]
    fn preview_truncates_to_fixed_width() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(SessionContext::new(dir.path(), 1)).unwrap();
        let path = dir.path().join("oxiask_transcript-8");

        let mut record = SessionRecord::seeded("gpt-4o", "Be concise.");
        record.messages.push(Message::user("x".repeat(200)));
        store.save(&record, &path).unwrap();

        let preview = preview_line(&store, &path);
        assert_eq!(preview.chars().count(), PREVIEW_WIDTH);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn preview_survives_corrupt_sibling() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(SessionContext::new(dir.path(), 1)).unwrap();
        let path = dir.path().join("oxiask_transcript-8");
        std::fs::write(&path, "garbage").unwrap();

        assert_eq!(preview_line(&store, &path), "(unreadable session)");
    }
}
