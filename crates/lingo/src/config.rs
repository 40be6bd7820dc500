//! Configuration management for lingo.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (LINGO_*)
//! 2. Config file (<data dir>/config.toml)
//! 3. Default values

use anyhow::{Context, Result};
use directories::ProjectDirs;
use lingo_core::config::{ClientConfig, DEFAULT_BASE_URL, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Session settings
    #[serde(default)]
    pub session: SessionSettings,

    /// Paths
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the backend API
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Idle time after which a cached session is considered expired
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for lingo data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

// Default value functions
fn default_api_url() -> String {
    std::env::var("LINGO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_age_hours() -> u64 {
    24
}

fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LINGO_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(proj_dirs) = ProjectDirs::from("app", "lingo", "lingo") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lingo")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_age_hours: default_max_age_hours(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionSettings::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        let mut config: Config = if config_path.exists() {
            let content =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };

        // Environment beats the file
        if let Ok(url) = std::env::var("LINGO_API_URL") {
            config.api.url = url;
        }
        if let Ok(dir) = std::env::var("LINGO_DATA_DIR") {
            config.paths.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("LINGO_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// File holding the persisted session pair.
    pub fn store_path(&self) -> PathBuf {
        self.paths.data_dir.join("session.json")
    }

    /// HTTP client settings for lingo-core.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.url.clone(),
            timeout_ms: self.api.timeout_ms,
        }
    }

    /// Session settings for lingo-core.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_age_secs: self.session.max_age_hours.saturating_mul(3600),
        }
    }

    /// Validate values that defaults cannot repair.
    pub fn validate(&self) -> Result<()> {
        self.client_config().validate()?;
        self.session_config().validate()?;
        Ok(())
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.paths.data_dir)
            .context("Failed to create data directory")?;
        Ok(())
    }
}
