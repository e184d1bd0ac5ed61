//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::minister::selectors::BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Search URL prefix; the category is appended verbatim
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sleep in seconds after the first failed attempt
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    /// Attempts made by the retry controller, also the transport retry budget
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Lower bound of the random sleep after later failed attempts
    #[serde(default = "default_jitter_min_secs")]
    pub jitter_min_secs: u64,

    /// Upper bound (inclusive) of the random sleep after later failed attempts
    #[serde(default = "default_jitter_max_secs")]
    pub jitter_max_secs: u64,

    /// Backoff factor for transport retries on 5xx responses
    #[serde(default = "default_backoff_factor_secs")]
    pub backoff_factor_secs: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_initial_delay_secs() -> u64 {
    3
}

fn default_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_jitter_min_secs() -> u64 {
    15
}

fn default_jitter_max_secs() -> u64 {
    60
}

fn default_backoff_factor_secs() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            initial_delay_secs: default_initial_delay_secs(),
            retries: default_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            jitter_min_secs: default_jitter_min_secs(),
            jitter_max_secs: default_jitter_max_secs(),
            backoff_factor_secs: default_backoff_factor_secs(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("baseball-prices").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("BBM_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }

        if let Ok(retries) = std::env::var("BBM_RETRIES") {
            if let Ok(r) = retries.parse() {
                self.retries = r;
            }
        }

        if let Ok(delay) = std::env::var("BBM_DELAY") {
            if let Ok(d) = delay.parse() {
                self.initial_delay_secs = d;
            }
        }

        self
    }

    /// Sleep bounds for later retries, with the bounds put in order.
    pub fn jitter_range(&self) -> (u64, u64) {
        if self.jitter_min_secs <= self.jitter_max_secs {
            (self.jitter_min_secs, self.jitter_max_secs)
        } else {
            (self.jitter_max_secs, self.jitter_min_secs)
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
