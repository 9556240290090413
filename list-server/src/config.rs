//! Configuration loading for list-server.
//!
//! Configuration is loaded from a TOML file (default: `list-server.toml`).

use list_core::LimitPolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration for list-server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Listing configuration.
    #[serde(default)]
    pub list: ListConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server (default: 0.0.0.0:8080).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
    /// Connection pool size (default: 10).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Listing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
    /// Page size when a request has no limit (default: 25).
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Page size cap; larger requests are clamped (default: 100).
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("list-server.db")
}

fn default_max_connections() -> u32 {
    10
}

fn default_limit() -> u32 {
    LimitPolicy::DEFAULT_LIMIT
}

fn default_max_limit() -> u32 {
    LimitPolicy::MAX_LIMIT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl ListConfig {
    /// Page size policy for the list service.
    pub fn policy(&self) -> LimitPolicy {
        LimitPolicy::new(self.default_limit, self.max_limit)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let list = &self.list;
        if list.default_limit == 0 || list.max_limit == 0 {
            return Err(ConfigError::Invalid {
                reason: "list limits must be at least 1".to_string(),
            });
        }
        if list.default_limit > list.max_limit {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "default_limit ({}) exceeds max_limit ({})",
                    list.default_limit, list.max_limit
                ),
            });
        }
        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid {
                reason: "storage.max_connections must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// Configuration values are out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}
