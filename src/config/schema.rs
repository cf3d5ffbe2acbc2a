//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a share
//! session. All types derive Serde traits for deserialization from an
//! optional config file; CLI flags override whatever the file provides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serving mode, chosen once at startup and fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServeMode {
    /// Serve files from the shared directory as-is. `.php` files are
    /// delivered as opaque bytes, never executed.
    #[default]
    Static,

    /// Forward requests to a locally running PHP-capable server.
    PhpProxy,
}

impl ServeMode {
    /// Human-readable mode name used on the info endpoint and in the banner.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServeMode::Static => "Static Files",
            ServeMode::PhpProxy => "PHP Proxy",
        }
    }
}

/// Root configuration for a share session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Absolute path of the directory being shared.
    pub root_dir: PathBuf,

    /// Port the listener binds on.
    pub port: u16,

    /// Serving mode. Degrades from `PhpProxy` to `Static` at startup when no
    /// backend is detected.
    pub mode: ServeMode,

    /// Port of the detected PHP backend. Must be set when `mode` is
    /// `PhpProxy`.
    pub backend_port: Option<u16>,

    /// Optional path to a custom landing page document. When unset or
    /// missing on disk a built-in placeholder is used.
    pub landing_page: Option<PathBuf>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Maximum request body size forwarded to the backend, in bytes.
    pub max_body_size: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            port: 8000,
            mode: ServeMode::Static,
            backend_port: None,
            landing_page: None,
            timeouts: TimeoutConfig::default(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl ShareConfig {
    /// Final path segment of the shared directory, used as the confining URL
    /// prefix. `None` when the shared directory is the filesystem root
    /// itself, in which case no prefix confinement applies.
    pub fn base_dir_name(&self) -> Option<String> {
        base_dir_name(&self.root_dir)
    }
}

/// Final path segment of a directory path, if it has one.
pub fn base_dir_name(dir: &Path) -> Option<String> {
    dir.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TCP connect timeout when probing candidate backend ports, in
    /// milliseconds.
    pub probe_connect_ms: u64,

    /// HTTP timeout for the detection GET against a candidate port, in
    /// milliseconds.
    pub probe_http_ms: u64,

    /// Full request/response exchange timeout against the PHP backend, in
    /// seconds.
    pub backend_secs: u64,

    /// Overall per-request timeout enforced at the server layer, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_connect_ms: 500,
            probe_http_ms: 1000,
            backend_secs: 10,
            request_secs: 30,
        }
    }
}
