//! Config loader — reads `~/.oxiask/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.oxiask/config.json`
//! 3. Environment variables `OXIASK_<SECTION>__<FIELD>` (override JSON);
//!    `OPENAI_API_KEY` fills the provider key when nothing else set one.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `OXIASK_<SECTION>__<FIELD>` (double underscore as
/// delimiter).
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("OXIASK_CHAT__MODEL") {
        config.chat.model = val;
    }
    if let Ok(val) = std::env::var("OXIASK_CHAT__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.chat.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("OXIASK_CHAT__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.chat.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("OXIASK_CHAT__VISION_DETAIL") {
        config.chat.vision_detail = val;
    }

    if let Ok(val) = std::env::var("OXIASK_PROVIDER__API_KEY") {
        config.provider.api_key = val;
    }
    if let Ok(val) = std::env::var("OXIASK_PROVIDER__API_BASE") {
        config.provider.api_base = val;
    }

    // Conventional fallback when no key is configured anywhere else.
    if config.provider.api_key.is_empty() {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            config.provider.api_key = val;
        }
    }

    if let Ok(val) = std::env::var("OXIASK_VIEWER__EDITOR") {
        config.viewer.editor = Some(val);
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
