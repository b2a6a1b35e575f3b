//! Configuration file parser for ~/.config/kiosque/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Command-line flags override whatever is set here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Collection path or http(s) URL. `None` means `articles.json`.
    pub source: Option<String>,

    /// Fail the load on the first malformed article instead of skipping it.
    pub strict: bool,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Capture mouse events (click to open, wheel to scroll).
    pub mouse: bool,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            source: None,
            strict: false,
            request_timeout_secs: 20,
            mouse: true,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "theme",
        "source",
        "strict",
        "request_timeout_secs",
        "mouse",
        "keybindings",
    ];

    /// `$HOME/.config/kiosque/config.toml`, or `None` when `HOME` is unset.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("kiosque")
                .join("config.toml")
        })
    }

    /// Request timeout as a `Duration`, never below one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing or blank file yields the defaults. Unknown keys are logged
    /// and otherwise ignored.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match read_capped(path, Self::MAX_FILE_SIZE) {
            Ok(content) => content,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        for key in Self::unknown_keys(&content) {
            tracing::warn!(key = %key, path = %path.display(), "Unknown config key, ignoring");
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            source = config.source.as_deref().unwrap_or(crate::loader::DEFAULT_SOURCE),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn unknown_keys(content: &str) -> Vec<String> {
        match content.parse::<toml::Table>() {
            Ok(raw) => raw
                .keys()
                .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Read `path` as UTF-8, failing once more than `limit` bytes have been read.
fn read_capped(path: &Path, limit: u64) -> Result<String, ConfigError> {
    let file = std::fs::File::open(path)?;
    let mut content = String::new();
    file.take(limit + 1).read_to_string(&mut content)?;
    if content.len() as u64 > limit {
        return Err(ConfigError::TooLarge(format!(
            "{} exceeds {} bytes",
            path.display(),
            limit
        )));
    }
    Ok(content)
}

// ============================================================================
// Tests
// ============================================================================
