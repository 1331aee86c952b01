//! Configuration management for DocGenie.
//!
//! Loads configuration from ${DOCGENIE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Server connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the conversion server.
    pub base_url: String,
    /// Timeout for list/detail/chat requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: Config::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: Config::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Default conversion options applied to every dropped batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub ocr_enabled: bool,
    pub table_extraction: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: false,
            table_extraction: true,
        }
    }
}

/// Initial pane widths and the drag floor, in percent of the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub structure_percent: f64,
    pub chat_percent: f64,
    pub min_percent: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            structure_percent: 20.0,
            chat_percent: 25.0,
            min_percent: 5.0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `DOCGENIE_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub layout: LayoutConfig,
    pub log: LogConfig,
}

impl Config {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Loads configuration from the default path, then applies env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Applies `DOCGENIE_SERVER_URL` (if set and non-empty).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DOCGENIE_SERVER_URL") {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.server.base_url = trimmed.to_string();
            }
        }
    }

    /// Creates a config file with the default template.
    ///
    /// Fails if the file already exists (no silent overwrite).
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Request timeout for non-upload calls.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for DocGenie configuration and data directories.
    //!
    //! DOCGENIE_HOME resolution order:
    //! 1. DOCGENIE_HOME environment variable (if set)
    //! 2. ~/.config/docgenie (default)
    //! 3. ./.docgenie when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the DocGenie home directory.
    pub fn docgenie_home() -> PathBuf {
        if let Ok(home) = std::env::var("DOCGENIE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".docgenie"),
            |h| h.join(".config").join("docgenie"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        docgenie_home().join("config.toml")
    }

    /// Returns the directory that holds log files.
    pub fn logs_dir() -> PathBuf {
        docgenie_home().join("logs")
    }
}
