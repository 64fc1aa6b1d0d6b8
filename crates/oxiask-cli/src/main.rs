//! Oxiask CLI — entry point.
//!
//! # Modes
//!
//! - `ask [text]` — send a turn on the current conversation (or view the
//!   transcript when no text is given)
//! - `ask -i [text]` — attach a clipboard image to the prompt
//! - `ask -o` — manage ongoing conversations (interactive picker)
//! - `ask -c` — clear the current conversation
//! - `ask -l` — print the last message

mod clipboard;
mod helpers;
mod input;
mod picker;
mod transcript;

use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use oxiask_core::config::{load_config, Config};
use oxiask_core::types::{ContentPart, Message};
use oxiask_core::{ActiveConversation, SessionContext, SessionStore};
use oxiask_providers::{HttpProvider, LlmProvider, LlmRequestConfig};

use clipboard::ClipboardBackend;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Terminal conversational assistant — one ongoing conversation per shell.
#[derive(Parser)]
#[command(name = "ask", version, about, long_about = None)]
struct Cli {
    /// Manage ongoing conversations (interactive picker)
    #[arg(short = 'o', long = "manage", conflicts_with_all = ["clear", "last"])]
    manage: bool,

    /// Clear the current conversation
    #[arg(short = 'c', long = "clear", conflicts_with = "last")]
    clear: bool,

    /// Print the last message of the current conversation
    #[arg(short = 'l', long = "last")]
    last: bool,

    /// Attach an image from the clipboard to the prompt
    #[arg(short = 'i', long = "image")]
    image: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,

    /// Free-text prompt
    #[arg(trailing_var_arg = true)]
    prompt: Vec<String>,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config = load_config(None);
    let ctx = SessionContext::for_current_process();
    let store = SessionStore::new(ctx).context("failed to open session storage")?;

    if cli.manage {
        picker::run(&store)?;
        return Ok(());
    }

    if cli.clear {
        // Non-fatal by design: report and still exit cleanly.
        if let Err(e) = ActiveConversation::clear(&store) {
            eprintln!("{e}");
        }
        return Ok(());
    }

    if cli.last {
        let conv =
            ActiveConversation::load_or_create(&store, &config.chat.model, &config.chat.preamble)?;
        let message = conv.last_message()?;
        let value = serde_json::to_value(message)?;
        println!("{}", value["content"]);
        return Ok(());
    }

    let prompt = gather_prompt(&cli.prompt)?;
    if prompt.trim().is_empty() {
        let conv =
            ActiveConversation::load_or_create(&store, &config.chat.model, &config.chat.preamble)?;
        return transcript::show(conv.record(), &config.viewer.resolve_editor());
    }

    run_turn(&store, &config, prompt, cli.image).await
}

// ─────────────────────────────────────────────
// Ask mode
// ─────────────────────────────────────────────

/// One ask/answer turn on the active conversation.
async fn run_turn(
    store: &SessionStore,
    config: &Config,
    prompt: String,
    attach_image: bool,
) -> Result<()> {
    // Credential check happens before any session mutation.
    let provider = HttpProvider::new(&config.provider)?;

    let mut conv =
        ActiveConversation::load_or_create(store, &config.chat.model, &config.chat.preamble)?;

    let user_message = if attach_image {
        let backend = ClipboardBackend::detect();
        let png = backend.capture_png()?;
        Message::user_parts(vec![
            ContentPart::Text {
                text: prompt.clone(),
            },
            clipboard::image_part(&png, &config.chat.vision_detail),
        ])
    } else {
        Message::user(prompt)
    };

    // The request carries history + the pending user turn. Nothing is
    // persisted until the exchange succeeds, so a failed turn leaves the
    // stored history unmodified and retryable.
    let mut outbound = conv.record().clone();
    outbound.messages.push(user_message.clone());

    info!(messages = outbound.messages.len(), "sending conversation");
    helpers::print_thinking();
    let result = provider
        .send(&outbound, &LlmRequestConfig::from(&config.chat))
        .await;
    helpers::clear_thinking();
    let reply = result?;

    helpers::print_response(reply.display_text());

    conv.append_turn(user_message)
        .context("failed to persist the conversation after the turn")?;
    conv.append_turn(reply)
        .context("failed to persist the conversation after the turn")?;
    Ok(())
}

/// Assemble the prompt from positional args plus piped stdin, if any.
fn gather_prompt(args: &[String]) -> Result<String> {
    let mut prompt = args.join(" ");

    if !std::io::stdin().is_terminal() {
        let mut piped = String::new();
        std::io::stdin()
            .read_to_string(&mut piped)
            .context("failed to read piped input")?;
        if !piped.is_empty() {
            if !prompt.is_empty() {
                prompt.push('\n');
            }
            prompt.push_str(&piped);
        }
    }

    Ok(prompt)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("oxiask=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
