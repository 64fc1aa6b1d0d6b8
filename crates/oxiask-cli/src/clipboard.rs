//! Clipboard image capture.
//!
//! Capability is decided once at startup from the process table and passed
//! in as an explicit backend value; nothing downstream probes the
//! environment. Only Xorg and Wayland are supported.

use std::process::Command;

use base64::Engine as _;
use tracing::debug;

use oxiask_core::types::{ContentPart, ImageUrl};
use oxiask_core::Error;

/// Shell probe used to identify the running display server.
const PROCESS_TABLE_COMMAND: &str = "ps";

/// Which clipboard mechanism this machine supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipboardBackend {
    Unsupported,
    Xorg,
    Wayland,
}

impl ClipboardBackend {
    /// Probe the process table once and pick the backend.
    pub fn detect() -> Self {
        let output = match Command::new(PROCESS_TABLE_COMMAND).arg("-A").output() {
            Ok(out) => out,
            Err(_) => return ClipboardBackend::Unsupported,
        };
        let backend = Self::from_process_table(&String::from_utf8_lossy(&output.stdout));
        debug!(?backend, "clipboard backend detected");
        backend
    }

    /// Classify a process-table dump.
    pub fn from_process_table(table: &str) -> Self {
        let lower = table.to_lowercase();
        if lower.contains("xorg") {
            ClipboardBackend::Xorg
        } else if lower.contains("wayland") {
            ClipboardBackend::Wayland
        } else {
            ClipboardBackend::Unsupported
        }
    }

    fn capture_command(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            ClipboardBackend::Xorg => Some((
                "xclip",
                &["-selection", "clipboard", "-t", "image/png", "-o"],
            )),
            ClipboardBackend::Wayland => Some(("wl-paste", &[])),
            ClipboardBackend::Unsupported => None,
        }
    }

    /// Read PNG bytes from the clipboard.
    pub fn capture_png(&self) -> Result<Vec<u8>, Error> {
        let (program, args) = self.capture_command().ok_or_else(|| {
            Error::configuration(
                "Unsupported OS/DE combination. Only Xorg and Wayland are supported.",
            )
        })?;

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::configuration(format!("failed to run {program}: {e}")))?;

        if !output.status.success() {
            return Err(Error::configuration(format!(
                "{program} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

/// Wrap captured PNG bytes as a vision image part (base64 data URI).
pub fn image_part(png: &[u8], detail: &str) -> ContentPart {
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    ContentPart::ImageUrl {
        image_url: ImageUrl {
            url: format!("data:image/png;base64,{encoded}"),
            detail: Some(detail.to_string()),
        },
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_xorg_case_insensitively() {
        let table = "  PID TTY      TIME CMD\n  900 tty7  00:00:01 Xorg\n";
        assert_eq!(
            ClipboardBackend::from_process_table(table),
            ClipboardBackend::Xorg
        );
    }

    #[test]
    fn detects_wayland() {
        let table = "  PID TTY      TIME CMD\n  900 ?     00:00:01 kwin_wayland\n";
        assert_eq!(
            ClipboardBackend::from_process_table(table),
            ClipboardBackend::Wayland
        );
    }

    #[test]
    fn unknown_table_is_unsupported() {
        let table = "  PID TTY      TIME CMD\n    1 ?     00:00:01 init\n";
        assert_eq!(
            ClipboardBackend::from_process_table(table),
            ClipboardBackend::Unsupported
        );
    }

    #[test]
    fn unsupported_capture_is_configuration_error() {
        let err = ClipboardBackend::Unsupported.capture_png().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("Xorg and Wayland"));
    }

    #[test]
    fn image_part_builds_data_uri() {
        let part = image_part(b"\x89PNG", "high");
        match part {
            ContentPart::ImageUrl { image_url } => {
                assert!(image_url.url.starts_with("data:image/png;base64,"));
                assert_eq!(image_url.detail.as_deref(), Some("high"));
            }
            _ => panic!("Expected image part"),
        }
    }
}
