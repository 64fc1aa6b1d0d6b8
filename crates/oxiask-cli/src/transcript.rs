//! Editor-based transcript viewing.
//!
//! Invoked when ask mode gets no prompt: the conversation is dumped to a
//! temp file with rule lines and role banners, `$EDITOR` (or the configured
//! viewer) is spawned on it, and the file is removed afterwards.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};

use oxiask_core::types::SessionRecord;

/// Show the conversation in the user's editor.
pub fn show(record: &SessionRecord, editor: &str) -> Result<()> {
    let width = crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80);

    let path = history_dump_path();
    std::fs::write(&path, format_transcript(record, width))
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;

    let status = spawn_editor(editor, &path)
        .with_context(|| format!("failed to launch viewer '{editor}'"))?;
    std::fs::remove_file(&path)
        .with_context(|| format!("failed to remove {}", path.display()))?;

    if !status.success() {
        anyhow::bail!("viewer '{editor}' exited with {status}");
    }
    Ok(())
}

/// Render the whole conversation as banner-separated plain text.
fn format_transcript(record: &SessionRecord, width: usize) -> String {
    let mut out = String::new();
    for message in &record.messages {
        out.push_str(&format!(
            "\n\n{}\n▍{} ▐\n{}\n{}",
            "▃".repeat(width),
            message.role(),
            "▀".repeat(width),
            message.display_text()
        ));
    }
    out
}

fn history_dump_path() -> PathBuf {
    std::env::temp_dir().join("oxiask_hist")
}

/// Spawn the viewer command (which may carry its own arguments) on `path`.
fn spawn_editor(editor: &str, path: &std::path::Path) -> std::io::Result<std::process::ExitStatus> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("more");
    Command::new(program).args(parts).arg(path).status()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use oxiask_core::types::Message;

    fn sample_record() -> SessionRecord {
        let mut record = SessionRecord::seeded("gpt-4o", "Be concise.");
        record.messages.push(Message::user("why is the sky blue?"));
        record.messages.push(Message::assistant("Rayleigh scattering."));
        record
    }

    #[test]
    fn transcript_contains_role_banners_in_order() {
        let text = format_transcript(&sample_record(), 20);

        let system = text.find("▍system ▐").unwrap();
        let user = text.find("▍user ▐").unwrap();
        let assistant = text.find("▍assistant ▐").unwrap();
        assert!(system < user && user < assistant);
    }

    #[test]
    fn transcript_contains_message_content() {
        let text = format_transcript(&sample_record(), 20);
        assert!(text.contains("why is the sky blue?"));
        assert!(text.contains("Rayleigh scattering."));
    }

    #[test]
    fn transcript_rules_match_width() {
        let text = format_transcript(&sample_record(), 12);
        assert!(text.contains(&"▃".repeat(12)));
        assert!(text.contains(&"▀".repeat(12)));
    }
}
