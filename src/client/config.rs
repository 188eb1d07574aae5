use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::time::Duration;

/// Default backend base URL
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Default fixed request deadline
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const DEFAULT_ALERTS_PAGE_SIZE: u32 = 10;
const DEFAULT_CAMERA_PAGE_SIZE: u32 = 100;

/// Client configuration wrapper.
///
/// Built once at startup and handed to [`ApiClient`](crate::client::ApiClient);
/// nothing reads the environment after that.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self { app: builder.build()? })
    }

    pub fn from_app_config(app: AppConfig) -> Result<Self, ConfigError> {
        app.validate()?;
        Ok(Self { app })
    }

    /// Read `SALAMA_API_URL`, `SALAMA_REQUEST_TIMEOUT_SECS` and
    /// `SALAMA_ALERTS_REFRESH_MS`; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        if let Ok(url) = std::env::var("SALAMA_API_URL") {
            builder = builder.api_base_url(url);
        }
        if let Some(secs) = env_number("SALAMA_REQUEST_TIMEOUT_SECS")? {
            builder = builder.request_timeout_secs(secs);
        }
        if let Some(ms) = env_number("SALAMA_ALERTS_REFRESH_MS")? {
            builder = builder.alerts_refresh_interval_ms(ms);
        }
        Self::with_builder(builder)
    }

    /// Load a TOML file, see [`AppConfig::from_file`]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Self::from_app_config(AppConfig::from_file(path)?)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url().trim_end_matches('/'), path)
    }

    pub fn api_base_url(&self) -> &str {
        self.app.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.app.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn alerts_page_size(&self) -> u32 {
        self.app.alerts_page_size.unwrap_or(DEFAULT_ALERTS_PAGE_SIZE)
    }

    /// `None` when polling is disabled
    pub fn alerts_refresh_interval(&self) -> Option<Duration> {
        match self.app.alerts_refresh_interval_ms {
            Some(ms) if ms > 0 => Some(Duration::from_millis(ms)),
            _ => None,
        }
    }

    pub fn camera_page_size(&self) -> u32 {
        self.app.camera_page_size.unwrap_or(DEFAULT_CAMERA_PAGE_SIZE)
    }
}

fn env_number(key: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnv(key, e.to_string())),
        Err(_) => Ok(None),
    }
}
