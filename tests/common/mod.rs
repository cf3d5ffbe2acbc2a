//! Shared utilities for integration testing.
//!
//! Not every helper is used by every test binary.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use siteshare::config::{ServeMode, ShareConfig};
use siteshare::HttpServer;

/// Build a static-mode config for a shared directory.
pub fn static_config(root: &Path) -> ShareConfig {
    ShareConfig {
        root_dir: root.to_path_buf(),
        mode: ServeMode::Static,
        backend_port: None,
        ..Default::default()
    }
}

/// Build a proxy-mode config pointing at a backend port.
pub fn proxy_config(root: &Path, backend_port: u16) -> ShareConfig {
    ShareConfig {
        root_dir: root.to_path_buf(),
        mode: ServeMode::PhpProxy,
        backend_port: Some(backend_port),
        ..Default::default()
    }
}

/// Start a share server on an ephemeral port and return its base URL.
pub async fn spawn_server(config: ShareConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    // Wait for the accept loop to come up
    tokio::time::sleep(Duration::from_millis(100)).await;
    format!("http://{addr}")
}

/// Start a programmable mock PHP backend on an ephemeral port.
///
/// The closure receives the full raw request (head and body) and returns
/// `(status, extra headers, body)` for the response.
pub async fn start_php_backend<F>(f: F) -> u16
where
    F: Fn(&str) -> (u16, Vec<(String, String)>, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let request = match read_request(&mut socket).await {
                            Some(r) => r,
                            None => return,
                        };

                        let (status, headers, body) = f(&request);
                        let status_text = match status {
                            200 => "200 OK",
                            301 => "301 Moved Permanently",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            _ => "200 OK",
                        };

                        let mut response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            status_text,
                            body.len()
                        );
                        for (name, value) in headers {
                            response.push_str(&format!("{name}: {value}\r\n"));
                        }
                        response.push_str("\r\n");
                        response.push_str(&body);

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    port
}

/// Read one full HTTP request (head plus Content-Length body) as a string.
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buf.len() < body_start + content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    Some(String::from_utf8_lossy(&buf).to_string())
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Send a raw HTTP/1.1 request and return the raw response as a string.
/// Used where a URL library would normalize the interesting part away.
pub async fn raw_request(addr: &str, request: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    let _ = stream.read_to_end(&mut response).await;
    String::from_utf8_lossy(&response).to_string()
}

/// A reqwest client that does not follow redirects, so 301/302 responses
/// can be asserted directly.
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
