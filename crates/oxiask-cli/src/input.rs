//! Raw-terminal key input for the session picker.
//!
//! Raw mode is held by an RAII guard, so the terminal is restored on every
//! exit path: normal completion, early `?` return, and cancellation alike.
//! Decoding leans on crossterm's event parser: multi-byte escape sequences
//! arrive as whole key events, never as stray `Literal` fragments.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// A discrete navigation command decoded from the keyboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Up,
    Down,
    Enter,
    Delete,
    /// Cancellation signal (Ctrl+C), not a normal command.
    Interrupt,
    /// Anything unrecognized, carrying the typed text if there was any.
    Literal(String),
}

/// Scoped raw-mode acquisition. Normal line-buffered mode comes back when
/// this guard drops.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking, infinite stream of [`KeyCommand`]s. Owns the raw-mode guard
/// for the duration of the picker session.
pub struct KeyInput {
    _guard: RawModeGuard,
}

impl KeyInput {
    pub fn new() -> io::Result<Self> {
        Ok(KeyInput {
            _guard: RawModeGuard::acquire()?,
        })
    }

    /// Block until the next decoded command.
    pub fn next_command(&mut self) -> io::Result<KeyCommand> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                return Ok(decode_key(key));
            }
        }
    }
}

/// Map one key event to a command.
fn decode_key(key: KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return KeyCommand::Interrupt;
        }
    }

    match key.code {
        KeyCode::Up => KeyCommand::Up,
        KeyCode::Down => KeyCommand::Down,
        KeyCode::Enter => KeyCommand::Enter,
        KeyCode::Delete => KeyCommand::Delete,
        KeyCode::Char('d') | KeyCode::Char('D') => KeyCommand::Delete,
        KeyCode::Char(c) => KeyCommand::Literal(c.to_string()),
        _ => KeyCommand::Literal(String::new()),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
