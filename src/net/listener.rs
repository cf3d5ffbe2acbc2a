//! Listener binding with classified errors.
//!
//! # Responsibilities
//! - Bind the listening socket on all interfaces
//! - Classify OS bind errors into retryable vs. terminal
//!
//! The retry loop itself lives in the CLI layer: on `AddressInUse` the user
//! is prompted for a different port, up to an externally supplied budget.
//! `PermissionDenied` (privileged port without privilege) is terminal.

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener binding.
#[derive(Debug, Error)]
pub enum BindError {
    /// The port is already bound by another process. Retryable with a
    /// different port.
    #[error("port {0} is already in use")]
    AddressInUse(u16),

    /// Binding was refused by the OS, typically a privileged port without
    /// sufficient privilege. Terminal.
    #[error("permission denied to use port {0}")]
    PermissionDenied(u16),

    /// Any other OS-level failure.
    #[error("failed to bind port {port}: {source}")]
    Other {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

impl BindError {
    /// Whether the caller may retry with a different port.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BindError::AddressInUse(_))
    }

    fn classify(port: u16, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::AddrInUse => BindError::AddressInUse(port),
            std::io::ErrorKind::PermissionDenied => BindError::PermissionDenied(port),
            _ => BindError::Other { port, source: err },
        }
    }
}

/// Bind a TCP listener on all interfaces at the given port.
pub async fn bind_listener(port: u16) -> Result<TcpListener, BindError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| BindError::classify(port, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| BindError::classify(port, e))?;

    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}
