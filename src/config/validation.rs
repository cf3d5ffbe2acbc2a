//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the shared directory exists and is a directory
//! - Validate value ranges (port, timeouts)
//! - Enforce the proxy invariant: `PhpProxy` requires a backend port
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ShareConfig → Result<(), Vec<ValidationError>>
//! - Runs after CLI flags are merged, before the server starts

use thiserror::Error;

use crate::config::schema::{ServeMode, ShareConfig};

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("shared directory not found: {0}")]
    RootMissing(String),

    #[error("shared path is not a directory: {0}")]
    RootNotDirectory(String),

    #[error("invalid port number {0}, must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("PHP proxy mode requires a backend port")]
    MissingBackendPort,

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a resolved configuration, collecting every failure.
pub fn validate_config(config: &ShareConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let root = &config.root_dir;
    if !root.exists() {
        errors.push(ValidationError::RootMissing(root.display().to_string()));
    } else if !root.is_dir() {
        errors.push(ValidationError::RootNotDirectory(
            root.display().to_string(),
        ));
    }

    if config.port == 0 {
        errors.push(ValidationError::InvalidPort(config.port));
    }

    if config.mode == ServeMode::PhpProxy && config.backend_port.is_none() {
        errors.push(ValidationError::MissingBackendPort);
    }

    for (name, value) in [
        ("probe_connect_ms", config.timeouts.probe_connect_ms),
        ("probe_http_ms", config.timeouts.probe_http_ms),
        ("backend_secs", config.timeouts.backend_secs),
        ("request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
