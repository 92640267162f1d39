//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::settings::AuditSettings;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported configuration format: {0:?}")]
    UnsupportedFormat(String),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, validate and normalize a gateway configuration.
///
/// The format is picked from the file extension: `.json` or `.toml`.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let config: ServiceConfig = match extension.as_str() {
        "json" => serde_json::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    tracing::debug!(path = ?path, endpoints = config.endpoints.len(), "Configuration parsed");
    finish(config)
}

/// Parse, validate and normalize a JSON configuration held in memory.
pub fn from_json_str(content: &str) -> Result<ServiceConfig, ConfigError> {
    let config: ServiceConfig = serde_json::from_str(content)?;
    finish(config)
}

fn finish(mut config: ServiceConfig) -> Result<ServiceConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    config.normalize();
    Ok(config)
}

/// Load audit settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<AuditSettings, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
