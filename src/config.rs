//! Configuration types for the vidfind service.
//!
//! Loaded from TOML (see [`AppConfig::default_config_path`], or the path in
//! `VIDFIND_CONFIG` for the server binary) and then
//! adjusted by environment overrides:
//!
//! - `VIDFIND_HOST` overrides `server.host`
//! - `VIDFIND_PORT` overrides `server.port`
//! - `CORS_ORIGINS` overrides `server.cors_origins` (comma separated)
//! - `VIDFIND_DB_PATH` overrides `store.db_path`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vidfind_search::SearchConfig;

use crate::error::{AppError, Result};

/// Top-level configuration for the API service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Status-check store settings.
    pub store: StoreConfig,
    /// Video search settings.
    pub search: SearchConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port (`0` = auto-assign).
    pub port: u16,
    /// Origins allowed by the CORS layer. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8001,
            cors_origins: vec!["*".to_owned()],
        }
    }
}

impl ServerConfig {
    /// Whether the CORS layer should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o.trim() == "*")
    }
}

/// Status-check store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_data_dir().join("status.db"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// Environment overrides are applied in both cases and the result is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable, an override is
    /// malformed, or validation fails.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `VIDFIND_PORT` is not a valid port.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("VIDFIND_HOST") {
            self.server.host = host.trim().to_owned();
        }
        if let Some(port) = get("VIDFIND_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("VIDFIND_PORT={port}: {e}")))?;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Some(db_path) = get("VIDFIND_DB_PATH") {
            self.store.db_path = PathBuf::from(db_path);
        }
        Ok(())
    }

    /// Check the configuration for values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Config("server.host must not be empty".into()));
        }
        self.search
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Returns the default config file path: `<config dir>/vidfind/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("vidfind"))
            .unwrap_or_else(|| PathBuf::from("/tmp/vidfind-config"))
            .join("config.toml")
    }
}

/// Application data root: `<data dir>/vidfind/`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("vidfind"))
        .unwrap_or_else(|| PathBuf::from("/tmp/vidfind-data"))
}
