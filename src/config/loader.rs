//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ShareConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file. Validation runs separately, after
/// CLI flags have been merged in.
pub fn load_config(path: &Path) -> Result<ShareConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ShareConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Validate a fully resolved configuration, wrapping failures in
/// [`ConfigError`].
pub fn finalize_config(config: ShareConfig) -> Result<ShareConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
