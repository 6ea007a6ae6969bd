//! Configuration file parser for ~/.config/newsflash/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use crate::headlines::ControllerSettings;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Env var overriding `base_host`.
pub const BASE_HOST_ENV: &str = "NEWSFLASH_BASE_HOST";

/// Locale variables consulted for the default language, highest priority first.
const LOCALE_ENV: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

const FALLBACK_LANGUAGE: &str = "en";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
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
///
/// Custom Debug impl masks `api_token`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API host plus path prefix, without scheme (e.g. "gnews.io/api/v4").
    /// A full `http(s)://` URL is accepted too.
    pub base_host: String,

    /// API token (alternative to GNEWS_API_KEY env var).
    /// Env var takes precedence over config file.
    pub api_token: Option<String>,

    /// Two-letter language code for results. Defaults to the user's locale.
    pub language: String,

    /// Country filter for top headlines.
    pub country: Option<String>,

    /// Result cap for headlines and search.
    pub max_articles: u32,

    /// Quiet period before a typed query is searched.
    pub debounce_ms: u64,

    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_host: "gnews.io/api/v4".to_string(),
            api_token: None,
            language: system_language(),
            country: None,
            max_articles: 50,
            debounce_ms: 500,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_host", &self.base_host)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("language", &self.language)
            .field("country", &self.country)
            .field("max_articles", &self.max_articles)
            .field("debounce_ms", &self.debounce_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "base_host",
        "api_token",
        "language",
        "country",
        "max_articles",
        "debounce_ms",
        "request_timeout_secs",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse config from TOML text. Blank input yields defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            base_host = %config.base_host,
            language = %config.language,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply `NEWSFLASH_BASE_HOST` if set.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var(BASE_HOST_ENV) {
            let host = host.trim();
            if !host.is_empty() {
                tracing::info!(base_host = %host, "Using base host from environment");
                self.base_host = host.to_string();
            }
        }
    }

    /// Base URL for the API client. Hosts without a scheme get `https://`.
    pub fn base_url(&self) -> String {
        let host = self.base_host.trim().trim_end_matches('/');
        if host.starts_with("https://") || host.starts_with("http://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            language: self.language.clone(),
            country: self.country.clone().filter(|c| !c.trim().is_empty()),
            max_articles: self.max_articles.max(1),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

// ============================================================================
// Locale
// ============================================================================

/// Two-letter language code from a POSIX locale string such as `de_DE.UTF-8`.
///
/// Returns `None` for `C`/`POSIX` and for values without a leading
/// two-letter language.
pub fn language_from_locale(locale: &str) -> Option<String> {
    let letters: String = locale
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.len() < 2 || letters.eq_ignore_ascii_case("posix") {
        return None;
    }
    Some(letters[..2].to_ascii_lowercase())
}

/// Language from the first set locale variable, or `en`.
pub fn system_language() -> String {
    LOCALE_ENV
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .and_then(|value| language_from_locale(&value))
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

// ============================================================================
// Tests
// ============================================================================
