//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::storage::StorageConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// File names inside the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Current season snapshot
    #[serde(default = "default_snapshot_file")]
    pub file: String,

    #[serde(default = "default_hall_of_fame_file")]
    pub hall_of_fame_file: String,

    /// Lifetime counters captured at season start
    #[serde(default = "default_baseline_file")]
    pub baseline_file: String,
}

fn default_snapshot_file() -> String {
    "data.json".to_string()
}

fn default_hall_of_fame_file() -> String {
    "hall_of_fame.json".to_string()
}

fn default_baseline_file() -> String {
    "baseline.json".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            file: default_snapshot_file(),
            hall_of_fame_file: default_hall_of_fame_file(),
            baseline_file: default_baseline_file(),
        }
    }
}

/// Leaderboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Entries per category board
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Start a new season on the next build
    #[serde(default)]
    pub reset_season: bool,
}

fn default_top_k() -> usize {
    3
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            reset_season: false,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub leaderboard: LeaderboardConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            snapshot: SnapshotConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists. `None` means the caller
    /// should fall back to defaults.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "Leaderboard top_k must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Storage paths derived from this configuration.
    pub fn storage(&self) -> StorageConfig {
        StorageConfig::from_parts(self.data_dir.clone(), &self.snapshot)
    }
}
