use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Top-level Glossa configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

/// Which replica answers a read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    /// Always the nearest (first listed) replica.
    #[default]
    LocalOne,
    /// Any single replica, rotating across nodes.
    One,
}

/// Store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Replica addresses. Each is a data directory holding `<keyspace>.db`.
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default = "default_keyspace")]
    pub keyspace: String,
    /// Per-operation timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connections_per_node")]
    pub connections_per_node: u32,
    #[serde(default)]
    pub consistency: Consistency,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            keyspace: default_keyspace(),
            timeout_ms: default_timeout_ms(),
            connections_per_node: default_connections_per_node(),
            consistency: Consistency::default(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// --- Default value functions ---

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_keyspace() -> String {
    "translations".to_string()
}
fn default_timeout_ms() -> u64 {
    100
}
fn default_connections_per_node() -> u32 {
    10
}

/// Load configuration from a TOML file.
///
/// A missing file is not an error; defaults are used instead.
pub fn load(path: &str) -> Result<Config, ConfigError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject settings that can never serve a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.keyspace.is_empty() {
            return Err(ConfigError::Invalid("store.keyspace is empty".into()));
        }
        if self.store.timeout_ms == 0 {
            return Err(ConfigError::Invalid("store.timeout_ms must be > 0".into()));
        }
        if self.store.connections_per_node == 0 {
            return Err(ConfigError::Invalid(
                "store.connections_per_node must be > 0".into(),
            ));
        }
        Ok(())
    }
}
