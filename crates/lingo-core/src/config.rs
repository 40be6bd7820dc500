//! Session and client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Session coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum idle time before a cached session is treated as expired
    /// (default: 86400 = 24 hours)
    pub max_age_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 86_400, // 24 hours
        }
    }
}

impl SessionConfig {
    /// Set the validity window
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age_secs = max_age.as_secs();
        self
    }

    /// Validity window as a chrono duration
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_age_secs.min(i64::MAX as u64) as i64)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_age_secs == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "session.max_age_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

/// Backend HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL
    pub base_url: String,

    /// Request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidValue {
                field: "api.url".into(),
                message: format!("expected an http(s) URL, got '{}'", self.base_url),
            });
        }

        if self.timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "api.timeout_ms".into(),
                message: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
