//! Configuration for the Coinbase API client.
//!
//! Built in code with the `with_*` methods, or loaded from a TOML file:
//!
//! ```toml
//! base_url = "https://api.exchange.coinbase.com"
//! timeout = 30
//! user_agent = "coinbase-loader/0.1.0"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`Config::base_url`].
pub const BASE_URL_ENV: &str = "COINBASE_API_URL";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML for [`Config`].
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for the Coinbase API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for REST API (default: https://api.exchange.coinbase.com).
    pub base_url: String,
    /// Request timeout, whole seconds in config files.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: crate::BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("coinbase-api-rust/{}", crate::VERSION),
        }
    }
}

impl Config {
    /// Create a configuration for the given endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Apply `COINBASE_API_URL` if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => self.with_base_url(url.trim()),
            _ => self,
        }
    }

    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        let base_url = config.base_url.clone();
        Ok(config.with_base_url(base_url))
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./coinbase.toml`
    /// 2. `~/.config/coinbase-loader/config.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        Self::search_paths()
            .into_iter()
            .find_map(|path| Self::load(path).ok())
            .unwrap_or_default()
    }

    /// Candidate config file locations, in search order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("coinbase.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("coinbase-loader").join("config.toml"));
        }
        paths
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://api.exchange.coinbase.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("coinbase-api-rust/"));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let config = Config::new("http://localhost:8080/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("tests");

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml("timeout = 10\nbase_url = \"https://sandbox.example.com/\"")
            .unwrap();

        assert_eq!(config.base_url, "https://sandbox.example.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, Config::default().user_agent);
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(matches!(
            Config::from_toml("timeout = \"soon\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/coinbase.toml"),
            Err(ConfigError::ReadError(_))
        ));
    }

    // The only test in this crate touching the variable
    #[test]
    fn test_env_override() {
        std::env::set_var(BASE_URL_ENV, "  http://localhost:7000/  ");
        let config = Config::new("https://api.exchange.coinbase.com").with_env_overrides();
        assert_eq!(config.base_url, "http://localhost:7000");

        std::env::set_var(BASE_URL_ENV, "   ");
        let config = Config::new("https://api.exchange.coinbase.com").with_env_overrides();
        assert_eq!(config.base_url, "https://api.exchange.coinbase.com");

        std::env::remove_var(BASE_URL_ENV);
        let config = Config::default().with_env_overrides();
        assert_eq!(config.base_url, crate::BASE_URL);
    }

    #[test]
    fn test_search_paths_start_in_cwd() {
        assert_eq!(Config::search_paths()[0], PathBuf::from("coinbase.toml"));
    }
}
