//! Run configuration for `interpel`.
//!
//! The config file is JSON and lists the tracked representatives together
//! with the chat mentions to ping for each of them.
//!
//! # Example
//!
//! ```json
//! {
//!   "sejm_term": "10",
//!   "mattermost_webhook_url": "https://chat.example.org/hooks/abc123",
//!   "mps": [
//!     { "id": "123", "mattermost_users": "@alice @bob" },
//!     { "id": "456", "mattermost_users": "@carol" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use interpel_core::model::string_or_number;
use interpel_core::TrackedPerson;
use serde::Deserialize;
use tracing::warn;

/// Environment variable consulted when the config has no webhook URL.
pub const WEBHOOK_ENV: &str = "MATTERMOST_WEBHOOK_URL";

/// Public Sejm API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.sejm.gov.pl/sejm";

const DEFAULT_TERM: &str = "10";
const DEFAULT_BOT_USERNAME: &str = "InterpelBot";
const DEFAULT_BOT_ICON: &str = ":parliament:";

// ── Types ─────────────────────────────────────────────────────────────────────

/// Top-level configuration, loaded once per run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Parliamentary term, e.g. `"10"`. Numbers are accepted too.
    #[serde(
        rename = "sejm_term",
        default = "default_term",
        deserialize_with = "string_or_number"
    )]
    pub term: String,
    /// Incoming webhook of the chat channel.
    #[serde(rename = "mattermost_webhook_url", default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(rename = "mps", default)]
    pub persons: Vec<TrackedPerson>,
    /// Display name the webhook posts under.
    #[serde(default = "default_bot_username")]
    pub bot_username: String,
    /// Emoji shown as the webhook avatar.
    #[serde(default = "default_bot_icon")]
    pub bot_icon: String,
}

impl Config {
    /// Webhook URL from the config, falling back to [`WEBHOOK_ENV`].
    pub fn webhook_url(&self) -> Option<String> {
        self.resolve_webhook_url(std::env::var(WEBHOOK_ENV).ok())
    }

    fn resolve_webhook_url(&self, env_value: Option<String>) -> Option<String> {
        self.webhook_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| env_value.filter(|url| !url.trim().is_empty()))
    }
}

/// Errors that make the whole run impossible.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config '{0}' lists no representatives under \"mps\"")]
    NoPersons(PathBuf),
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Read and validate the config file at `path`.
///
/// Entries without an id are dropped with a warning; a config left with no
/// entries at all is an error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

fn parse_config(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let mut config: Config = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let before = config.persons.len();
    config.persons.retain(|p| !p.id.trim().is_empty());
    if config.persons.len() < before {
        warn!(
            skipped = before - config.persons.len(),
            "skipping representatives without an id"
        );
    }

    if config.persons.is_empty() {
        return Err(ConfigError::NoPersons(path.to_path_buf()));
    }
    if config.term.trim().is_empty() {
        config.term = default_term();
    }
    config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
    Ok(config)
}

fn default_term() -> String {
    DEFAULT_TERM.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_bot_username() -> String {
    DEFAULT_BOT_USERNAME.to_string()
}

fn default_bot_icon() -> String {
    DEFAULT_BOT_ICON.to_string()
}
