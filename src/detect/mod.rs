//! PHP backend detection.
//!
//! # Responsibilities
//! - Probe a short list of ports where MAMP/XAMPP/WAMP commonly listen
//! - Confirm an open port is actually a PHP-capable web server
//! - Return the first qualifying port, or nothing
//!
//! # Design Decisions
//! - Probe order is fixed: 80 (Apache default), 8888 (MAMP), 8080, 8000
//! - Any connect/protocol error on a candidate means "not a match" and
//!   detection moves on; nothing here is fatal
//! - Qualification is a substring check on the `Server` response header,
//!   case-insensitive, for apache/php/nginx

use std::time::Duration;

use axum::body::Body;
use hyper::header::SERVER;
use hyper::Request;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::TimeoutConfig;

/// Ports where local PHP stacks commonly listen, in probe order.
pub const CANDIDATE_PORTS: [u16; 4] = [80, 8888, 8080, 8000];

/// Probe the well-known candidate ports for a running PHP-capable server.
///
/// Returns the first qualifying port, or `None` when no candidate answers
/// with a recognizable `Server` header.
pub async fn find_php_backend(timeouts: &TimeoutConfig) -> Option<u16> {
    detect_on(&CANDIDATE_PORTS, timeouts).await
}

/// Probe an explicit list of candidate ports.
pub async fn detect_on(ports: &[u16], timeouts: &TimeoutConfig) -> Option<u16> {
    let client: Client<HttpConnector, Body> =
        Client::builder(TokioExecutor::new()).build(HttpConnector::new());

    for &port in ports {
        if let Some(server) = probe_port(&client, port, timeouts).await {
            tracing::info!(port, server = %server, "Found PHP-capable server");
            return Some(port);
        }
    }

    None
}

/// Check a single candidate. Returns the `Server` header value when the
/// port hosts a PHP-capable web server.
async fn probe_port(
    client: &Client<HttpConnector, Body>,
    port: u16,
    timeouts: &TimeoutConfig,
) -> Option<String> {
    // Cheap reachability check before speaking HTTP.
    let connect = TcpStream::connect(("127.0.0.1", port));
    timeout(Duration::from_millis(timeouts.probe_connect_ms), connect)
        .await
        .ok()?
        .ok()?;

    let uri = format!("http://127.0.0.1:{port}/");
    let request = Request::get(&uri).body(Body::empty()).ok()?;

    let response = timeout(
        Duration::from_millis(timeouts.probe_http_ms),
        client.request(request),
    )
    .await
    .ok()?
    .ok()?;

    let server = response
        .headers()
        .get(SERVER)
        .and_then(|v| v.to_str().ok())?
        .to_string();

    if is_php_capable(&server) {
        Some(server)
    } else {
        tracing::debug!(port, server = %server, "Open port is not a PHP-capable server");
        None
    }
}

/// Whether a `Server` header value indicates an Apache/PHP/Nginx stack.
fn is_php_capable(server: &str) -> bool {
    let server = server.to_lowercase();
    server.contains("apache") || server.contains("php") || server.contains("nginx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_server_header_matching() {
        assert!(is_php_capable("Apache/2.4.41 (Ubuntu)"));
        assert!(is_php_capable("nginx/1.18.0"));
        assert!(is_php_capable("PHP/8.2.0 Development Server"));
        assert!(!is_php_capable("Caddy"));
        assert!(!is_php_capable(""));
    }

    async fn spawn_backend_with_server_header(header: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let response = format!(
                    "HTTP/1.1 200 OK\r\nServer: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    header
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        port
    }

    #[tokio::test]
    async fn test_detects_apache_backend() {
        let port = spawn_backend_with_server_header("Apache/2.4").await;
        let detected = detect_on(&[port], &TimeoutConfig::default()).await;
        assert_eq!(detected, Some(port));
    }

    #[tokio::test]
    async fn test_skips_non_php_server() {
        let other = spawn_backend_with_server_header("Caddy").await;
        let apache = spawn_backend_with_server_header("Apache/2.4").await;
        let detected = detect_on(&[other, apache], &TimeoutConfig::default()).await;
        assert_eq!(detected, Some(apache));
    }

    #[tokio::test]
    async fn test_no_open_ports_returns_none() {
        // Grab an ephemeral port and release it so nothing is listening there.
        let free_port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let detected = detect_on(&[free_port], &TimeoutConfig::default()).await;
        assert_eq!(detected, None);
    }
}
