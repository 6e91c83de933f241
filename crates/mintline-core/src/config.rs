//! Process-wide configuration
//!
//! ## Configuration Resolution
//!
//! Values are layered, later layers winning:
//! 1. Built-in defaults (`https://api.mintline.ai`, no key)
//! 2. Optional TOML file (`MINTLINE_CONFIG`, else `~/.config/mintline/config.toml`)
//! 3. Environment (`MINTLINE_API_URL`, `MINTLINE_API_KEY`)
//! 4. CLI overrides applied by the binary
//!
//! ```toml
//! api_url = "https://api.mintline.ai"
//! api_key = "ml_live_..."
//! timeout_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.mintline.ai";

pub const ENV_API_URL: &str = "MINTLINE_API_URL";
pub const ENV_API_KEY: &str = "MINTLINE_API_KEY";
pub const ENV_CONFIG: &str = "MINTLINE_CONFIG";

/// Resolved bridge configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base service URL, without trailing slash
    pub api_url: String,
    /// Bearer credential (mandatory before serving)
    pub api_key: Option<String>,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Load from the config file (if any) and the process environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(default_config_path);

        let file_content = match path {
            Some(p) if p.exists() => Some(read_config_file(&p)?),
            _ => None,
        };

        Self::from_sources(file_content.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve from explicit sources (file content plus an env lookup)
    pub fn from_sources<F>(file_content: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(content) = file_content {
            let raw: RawConfig = toml::from_str(content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            if let Some(url) = raw.api_url {
                config.api_url = url;
            }
            config.api_key = raw.api_key;
            config.timeout = raw.timeout_secs.map(Duration::from_secs);
        }

        if let Some(url) = env(ENV_API_URL).filter(|s| !s.is_empty()) {
            config.api_url = url;
        }
        if let Some(key) = env(ENV_API_KEY).filter(|s| !s.is_empty()) {
            config.api_key = Some(key);
        }

        config.api_url = normalize_url(&config.api_url);
        Ok(config)
    }

    /// Override the base URL (CLI flag)
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_url(url);
        self
    }

    /// The bearer credential, or a startup error if none is configured
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::Config(format!(
                "{} environment variable is required",
                ENV_API_KEY
            ))),
        }
    }
}

/// Default config file location (~/.config/mintline/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mintline").join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config {}: {}",
            path.display(),
            e
        ))
    })
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
