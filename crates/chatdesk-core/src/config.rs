//! Client configuration
//!
//! Defaults, then `<data dir>/config.toml` if present, then `CHATDESK_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chatdesk_gateway::QueryMode;

use crate::error::CoreError;
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the chat backend
    pub base_url: String,
    /// Path to the local settings database
    pub database_path: PathBuf,
    /// Mode used until the user picks another
    pub default_mode: QueryMode,
    /// Store every exchange on the backend after a reply
    pub persist_exchanges: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            database_path: data_dir.join("chatdesk.db"),
            default_mode: QueryMode::Agent,
            persist_exchanges: false,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("chatdesk"))
            .unwrap_or_else(|| PathBuf::from(".chatdesk"))
    }

    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Default file plus process environment
    pub fn load() -> Result<Self> {
        Self::from_file(Self::config_path())?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a TOML config; a missing file yields the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply `CHATDESK_*` overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHATDESK_BASE_URL") {
            self.base_url = url;
        }
        if let Some(path) = lookup("CHATDESK_DATABASE") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(mode) = lookup("CHATDESK_MODE") {
            self.default_mode = mode.parse().map_err(CoreError::Config)?;
        }
        if let Some(flag) = lookup("CHATDESK_PERSIST_EXCHANGES") {
            self.persist_exchanges = parse_flag(&flag).ok_or_else(|| {
                CoreError::Config(format!("CHATDESK_PERSIST_EXCHANGES: not a boolean: {flag}"))
            })?;
        }
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
