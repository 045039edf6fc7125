//! Load config from a YAML file and check it before startup.

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "SUBSCRIBERS_CONFIG";

/// Used when `SUBSCRIBERS_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "resources/subscribers.yaml";

/// Config path from `SUBSCRIBERS_CONFIG`, default `resources/subscribers.yaml`.
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read, parse, and validate the config file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading config");
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.database.host.trim().is_empty() {
        return Err(ConfigError::Validation("database.host is required".into()));
    }
    if config.database.dbname.trim().is_empty() {
        return Err(ConfigError::Validation("database.dbname is required".into()));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::Validation("database.max_connections must be at least 1".into()));
    }
    let resource = &config.mvc.resource;
    if resource.is_empty() || resource.contains('/') || resource.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "mvc.resource must be a single path segment, got '{}'",
            resource
        )));
    }
    if config.log.filename.trim().is_empty() {
        return Err(ConfigError::Validation("log.filename is required".into()));
    }
    Ok(())
}
