//! Client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_sim_session::Difficulty;
use tracing::{debug, info, instrument};

/// Environment variable overriding the arbiter URL.
pub const ARBITER_URL_VAR: &str = "SIM_ARBITER_URL";

/// Settings for talking to the arbiter.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the arbiter.
    #[serde(default = "default_arbiter_url")]
    arbiter_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Difficulty used when none is given on the command line.
    #[serde(default)]
    difficulty: Difficulty,
}

fn default_arbiter_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            arbiter_url: default_arbiter_url(),
            request_timeout_secs: default_request_timeout_secs(),
            difficulty: Difficulty::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(arbiter_url = %config.arbiter_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if given (defaults otherwise), then applies the
    /// environment.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides looked up by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ARBITER_URL_VAR).filter(|url| !url.trim().is_empty()) {
            debug!(%url, "Arbiter URL taken from environment");
            self.arbiter_url = url;
        }
        self
    }

    /// Replaces the arbiter URL.
    pub fn with_arbiter_url(mut self, url: impl Into<String>) -> Self {
        self.arbiter_url = url.into();
        self
    }

    /// Replaces the default difficulty.
    pub fn with_difficulty(mut self, level: u8) -> Result<Self, ConfigError> {
        self.difficulty = Difficulty::try_from(level)
            .map_err(|e| ConfigError::new(format!("Invalid difficulty: {}", e)))?;
        Ok(self)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
