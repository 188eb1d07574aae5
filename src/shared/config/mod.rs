//! Application configuration module
//!
//! Provides configuration types for the dashboard client. Every field is
//! optional here; the client `Config` wrapper fills in defaults.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Backend base URL, e.g. `http://localhost:8000/api/v1`
    pub api_base_url: Option<String>,
    /// Fixed per-request deadline in seconds
    pub request_timeout_secs: Option<u64>,
    /// Alerts fetched per page
    pub alerts_page_size: Option<u32>,
    /// Alerts polling interval; 0 disables polling
    pub alerts_refresh_interval_ms: Option<u64>,
    /// Cameras fetched per list request
    pub camera_page_size: Option<u32>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document using the same keys as the struct fields
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.api_base_url {
            let parsed =
                reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(format!(
                    "{url}: unsupported scheme '{}'",
                    parsed.scheme()
                )));
            }
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue("request_timeout_secs", "must be positive"));
        }
        if self.alerts_page_size == Some(0) {
            return Err(ConfigError::InvalidValue("alerts_page_size", "must be positive"));
        }
        if self.camera_page_size == Some(0) {
            return Err(ConfigError::InvalidValue("camera_page_size", "must be positive"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the backend base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = Some(url.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn alerts_page_size(mut self, size: u32) -> Self {
        self.config.alerts_page_size = Some(size);
        self
    }

    pub fn alerts_refresh_interval_ms(mut self, ms: u64) -> Self {
        self.config.alerts_refresh_interval_ms = Some(ms);
        self
    }

    pub fn camera_page_size(mut self, size: u32) -> Self {
        self.config.camera_page_size = Some(size);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, &'static str),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnv(&'static str, String),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
