//! Top-level carequeue configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{defaults, ObservabilityConfig, StorageConfig, SyncConfig, TransportConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CAREQUEUE_*`)
/// 2. Project config (`carequeue.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CarequeueConfig {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub transport: TransportConfig,
    pub observability: ObservabilityConfig,
}

impl CarequeueConfig {
    /// Load configuration from `root/carequeue.toml` and the process environment.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(root, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit environment lookup.
    pub fn load_with_env<F>(root: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = root.join(defaults::CONFIG_FILENAME);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a single TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.max_retries == 0 {
            return Err(invalid("sync.max_retries", "must be at least 1"));
        }
        if !self.sync.batch_endpoint.starts_with('/') {
            return Err(invalid("sync.batch_endpoint", "must start with '/'"));
        }
        if self.transport.timeout_ms == 0 {
            return Err(invalid("transport.timeout_ms", "must be greater than 0"));
        }
        if self.transport.base_url.trim().is_empty() {
            return Err(invalid("transport.base_url", "must not be empty"));
        }
        if self.storage.max_dead_letters == 0 {
            return Err(invalid("storage.max_dead_letters", "must be at least 1"));
        }
        if self.storage.db_path.trim().is_empty() {
            return Err(invalid("storage.db_path", "must not be empty"));
        }
        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env("CAREQUEUE_DB_PATH") {
            self.storage.db_path = val;
        }
        if let Some(val) = env("CAREQUEUE_MAX_DEAD_LETTERS") {
            self.storage.max_dead_letters = parse_env("CAREQUEUE_MAX_DEAD_LETTERS", &val)?;
        }
        if let Some(val) = env("CAREQUEUE_BASE_URL") {
            self.transport.base_url = val;
        }
        if let Some(val) = env("CAREQUEUE_TIMEOUT_MS") {
            self.transport.timeout_ms = parse_env("CAREQUEUE_TIMEOUT_MS", &val)?;
        }
        if let Some(val) = env("CAREQUEUE_MAX_RETRIES") {
            self.sync.max_retries = parse_env("CAREQUEUE_MAX_RETRIES", &val)?;
        }
        if let Some(val) = env("CAREQUEUE_BATCH_ENDPOINT") {
            self.sync.batch_endpoint = val;
        }
        if let Some(val) = env("CAREQUEUE_SYNC_INTERVAL_SECS") {
            self.sync.sync_interval_secs = parse_env("CAREQUEUE_SYNC_INTERVAL_SECS", &val)?;
        }
        if let Some(val) = env("CAREQUEUE_LOG_JSON") {
            self.observability.json = matches!(val.as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim().parse().map_err(|_| ConfigError::ValidationFailed {
        field: key.to_string(),
        message: format!("cannot parse {val:?}"),
    })
}
