//! Shared CLI helpers — response printing and the waiting placeholder.

use colored::Colorize;

/// Print the assistant reply to stdout.
///
/// Plain content only, so the output stays pipe-friendly.
pub fn print_response(response: &str) {
    if response.is_empty() {
        eprintln!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
}

/// Print a waiting placeholder (stderr, so piped stdout stays clean).
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the waiting placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}
