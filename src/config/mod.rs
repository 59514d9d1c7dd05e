//! Configuration management for docket.
//!
//! Configuration is read from `~/.config/docket/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::domain::MAX_ORDERS;
use crate::engine::EngineConfig;
use crate::fetcher::FetcherConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub fetcher: FetcherConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/docket/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("docket").join("config.toml"))
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;
        if engine.candidate_urls.is_empty() {
            return Err(ConfigError::Invalid("engine.candidate_urls is empty".into()));
        }
        if let Err(e) = url::Url::parse(&engine.base_url) {
            return Err(ConfigError::Invalid(format!(
                "engine.base_url {:?} is not a valid URL: {}",
                engine.base_url, e
            )));
        }
        if engine.schemes.is_empty() {
            return Err(ConfigError::Invalid("engine.schemes is empty".into()));
        }
        if engine.attempts.is_empty() {
            return Err(ConfigError::Invalid("engine.attempts is empty".into()));
        }
        if engine.max_orders > MAX_ORDERS {
            return Err(ConfigError::Invalid(format!(
                "engine.max_orders {} exceeds {}",
                engine.max_orders, MAX_ORDERS
            )));
        }
        Ok(())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# docket configuration
#
# Every key is optional; anything left out uses the built-in default.
# Defining [[engine.schemes]] or [[engine.attempts]] replaces the whole
# built-in list, so copy the entries you want to keep.

[engine]
court_name = "District and Sessions Court, Wardha"

# Headings containing this term are taken as the case title
court_indicator = "wardha"

# Relative document links are resolved against this URL
base_url = "https://wardha.dcourts.gov.in"

# Entry points probed in order; the first genuine search page wins
# candidate_urls = [
#     "https://wardha.dcourts.gov.in/case-status-search-by-case-number/",
#     "https://wardha.dcourts.gov.in/case-status/",
# ]

# A candidate must mention at least this many signal terms
min_signal_score = 3

# ...and be larger than this many bytes
min_body_bytes = 1000

# Timeouts in seconds
probe_timeout_secs = 15
page_timeout_secs = 20
submit_timeout_secs = 30

# Pause between submission strategies (milliseconds)
pause_between_strategies_ms = 2000

# Maximum orders kept on a record (at most 10)
max_orders = 10

# Extra field-name guesses, most plausible first:
#
# [[engine.schemes]]
# name = "ecourts"
# case_type = "case_type"
# case_number = "case_no"
# year = "case_year"
# submit = { field = "submit", value = "Submit" }
# extra = { court_code = "wardha" }
#
# Method/path pairs tried for each scheme:
#
# [[engine.attempts]]
# method = "POST"
# suffix = ""

[fetcher]
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
accept_language = "en-US,en;q=0.9,hi;q=0.8"

# Court hosts often serve self-signed certificates
accept_invalid_certs = true

# Retries for 429/5xx responses, with linear backoff
max_retries = 3
retry_backoff_ms = 1000
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
