//! Configuration loading and resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "MOODTUNE_PORT";
/// Environment variable overriding the audio resolution service base URL
pub const ENV_RESOLVER_URL: &str = "MOODTUNE_RESOLVER_URL";
/// Environment variable overriding the expression model service base URL
pub const ENV_MODEL_URL: &str = "MOODTUNE_MODEL_URL";
/// Environment variable overriding the outbound request timeout
pub const ENV_TIMEOUT_MS: &str = "MOODTUNE_TIMEOUT_MS";

/// Player service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// HTTP listen port
    pub port: u16,
    /// Base URL of the audio resolution service
    pub resolver_url: String,
    /// Base URL of the expression model service
    pub model_url: String,
    /// Timeout for detection and resolution calls, in milliseconds
    ///
    /// A timed-out call surfaces as a detection/resolution failure and
    /// moves the pending state to Idle/Error like any other failure.
    pub request_timeout_ms: u64,
    /// Optional catalog override file
    pub catalog_path: Option<PathBuf>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            port: 5720,
            resolver_url: "http://127.0.0.1:5000".to_string(),
            model_url: "http://127.0.0.1:5710".to_string(),
            request_timeout_ms: 30_000,
            catalog_path: None,
        }
    }
}

impl PlayerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid config file {}: {}", path.display(), e)))
    }
}

/// Command-line values that take precedence over everything else
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub resolver_url: Option<String>,
    pub model_url: Option<String>,
    /// Explicit config file path; errors if the file is missing
    pub config_file: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

/// Resolve the effective configuration following the priority order above
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<PlayerConfig> {
    let mut config = if let Some(path) = &overrides.config_file {
        PlayerConfig::from_file(path)?
    } else if let Some(path) = default_config_path() {
        tracing::debug!("loading config from {}", path.display());
        PlayerConfig::from_file(&path)?
    } else {
        PlayerConfig::default()
    };

    if let Ok(value) = std::env::var(ENV_PORT) {
        config.port = value
            .parse()
            .map_err(|_| Error::Config(format!("invalid {}: {}", ENV_PORT, value)))?;
    }
    if let Ok(value) = std::env::var(ENV_RESOLVER_URL) {
        config.resolver_url = value;
    }
    if let Ok(value) = std::env::var(ENV_MODEL_URL) {
        config.model_url = value;
    }
    if let Ok(value) = std::env::var(ENV_TIMEOUT_MS) {
        config.request_timeout_ms = value
            .parse()
            .map_err(|_| Error::Config(format!("invalid {}: {}", ENV_TIMEOUT_MS, value)))?;
    }

    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(url) = &overrides.resolver_url {
        config.resolver_url = url.clone();
    }
    if let Some(url) = &overrides.model_url {
        config.model_url = url.clone();
    }
    if let Some(path) = &overrides.catalog_path {
        config.catalog_path = Some(path.clone());
    }

    Ok(config)
}

/// Default configuration file path for the platform, if one exists
///
/// Checks the user config directory first, then the system-wide path on
/// Linux.
fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("moodtune").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/moodtune/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    None
}
