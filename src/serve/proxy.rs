//! PHP proxy responder.
//!
//! # Responsibilities
//! - Forward confined requests to the local PHP backend
//! - Promote the subtree root to an explicit index file so PHP runs
//! - Cache-bust bare `.php` requests with a synthetic query parameter
//! - Relay status/headers/body, minus hop-by-hop headers
//! - Fall back to the landing page on a backend 404 for the bare root
//!
//! # Design Decisions
//! - The confining prefix is stripped before forwarding; the backend's
//!   document root is assumed to be the shared directory
//! - Request bodies are buffered up to `max_body_size` before forwarding;
//!   anything larger is rejected with 413 instead of being streamed
//! - Backend failures produce a 500 response, never a crashed worker
//! - The connect/headers phase is bounded by the backend timeout; the
//!   overall exchange is bounded by the server's request timeout layer

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tokio::time::timeout;

use crate::http::AppState;
use crate::serve::paths;

/// Synthetic query parameter appended to bare `.php` requests so backends
/// never serve cached static copies of PHP output.
const CACHE_BUST_PARAM: &str = "siteshare=1";

/// Request headers never forwarded to the backend. Accept-Encoding is
/// dropped so the backend answers identity-encoded; the relay strips
/// Content-Encoding and must not pass compressed bytes unlabeled.
const HOP_BY_HOP_REQUEST: [HeaderName; 3] = [
    header::TRANSFER_ENCODING,
    header::CONNECTION,
    header::ACCEPT_ENCODING,
];

/// Response headers never relayed to the client. Content-Encoding is
/// dropped because the proxy does not re-encode.
const HOP_BY_HOP_RESPONSE: [HeaderName; 3] = [
    header::TRANSFER_ENCODING,
    header::CONNECTION,
    header::CONTENT_ENCODING,
];

/// Forward a confined request to the PHP backend.
///
/// `stripped_path` is the raw request path with the confining prefix
/// removed, always starting with `/`.
pub async fn serve(state: &AppState, stripped_path: &str, request: Request<Body>) -> Response {
    let config = &state.config;
    let Some(backend_port) = config.backend_port else {
        // Startup degrades PhpProxy to Static when detection fails, so this
        // is unreachable with a validated config.
        tracing::error!("Proxy mode without a backend port");
        return backend_error("no PHP backend configured");
    };

    let local_index = paths::find_index(&config.root_dir);

    // Promote the bare root to the index file so PHP execution is
    // guaranteed rather than left to backend defaults.
    let forward_path = if stripped_path == "/" {
        match local_index {
            Some(index) => format!("/{index}"),
            None => "/".to_string(),
        }
    } else {
        stripped_path.to_string()
    };

    let is_php = forward_path.ends_with(".php");
    let query = request.uri().query().map(str::to_string);

    let target = match build_target_uri(backend_port, &forward_path, query.as_deref(), is_php) {
        Some(uri) => uri,
        None => {
            tracing::error!(path = %forward_path, "Could not build backend URI");
            return backend_error("invalid backend URL");
        }
    };

    if is_php {
        tracing::debug!(path = %stripped_path, target = %target, "Proxying PHP request");
    }

    let (parts, body) = request.into_parts();

    // Bodies are forwarded verbatim; chunked uploads are buffered here so
    // the backend sees a plain Content-Length request. The length limit is
    // the only failure mode of `to_bytes` short of a dropped connection.
    let body_bytes = match axum::body::to_bytes(body, config.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, limit = config.max_body_size, "Request body too large");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Html("<html><body><h1>413 Payload Too Large</h1></body></html>"),
            )
                .into_response();
        }
    };

    let mut backend_request = Request::builder().method(parts.method.clone()).uri(target);
    if let Some(headers) = backend_request.headers_mut() {
        copy_request_headers(&parts.headers, headers, is_php);
    }
    let backend_request = match backend_request.body(Body::from(body_bytes)) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Could not build backend request");
            return backend_error("could not build backend request");
        }
    };

    let backend_timeout = Duration::from_secs(config.timeouts.backend_secs);
    let response = match timeout(backend_timeout, state.client.request(backend_request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::error!(error = %e, port = backend_port, "PHP backend unreachable");
            return backend_error("the PHP backend did not respond");
        }
        Err(_) => {
            tracing::error!(port = backend_port, "PHP backend timed out");
            return backend_error("the PHP backend timed out");
        }
    };

    let status = response.status();

    // 404-on-root fallback: only when the shared directory itself has no
    // index file. With an index present a 404 is a genuine backend error
    // and is relayed as-is.
    if status == StatusCode::NOT_FOUND
        && local_index.is_none()
        && matches!(stripped_path, "/" | "/index.html")
    {
        tracing::debug!("Backend 404 for bare root, serving landing page");
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            Body::from(state.landing_page.clone()),
        )
            .into_response();
    }

    relay_response(response, is_php)
}

/// Build `http://127.0.0.1:{port}{path}[?query]`, appending the cache-bust
/// parameter to `.php` requests that carry no query of their own.
fn build_target_uri(port: u16, path: &str, query: Option<&str>, is_php: bool) -> Option<Uri> {
    let mut target = format!("http://127.0.0.1:{port}{path}");
    match query {
        Some(q) => {
            target.push('?');
            target.push_str(q);
        }
        None if is_php => {
            target.push('?');
            target.push_str(CACHE_BUST_PARAM);
        }
        None => {}
    }
    target.parse().ok()
}

/// Copy request headers minus hop-by-hop; PHP requests additionally get
/// headers that nudge backends into HTML responses.
fn copy_request_headers(from: &HeaderMap, to: &mut HeaderMap, is_php: bool) {
    for (name, value) in from {
        if HOP_BY_HOP_REQUEST.contains(name) {
            continue;
        }
        to.append(name.clone(), value.clone());
    }

    if is_php {
        to.insert(
            HeaderName::from_static("x-requested-with"),
            header::HeaderValue::from_static("XMLHttpRequest"),
        );
        to.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("text/html,application/xhtml+xml,application/xml"),
        );
    }
}

/// Relay the backend response: status copied, headers filtered, body
/// streamed verbatim.
fn relay_response(response: hyper::Response<hyper::body::Incoming>, is_php: bool) -> Response {
    let (parts, body) = response.into_parts();

    let mut relayed = Response::builder().status(parts.status);
    if let Some(headers) = relayed.headers_mut() {
        let mut content_type_ok = false;
        for (name, value) in &parts.headers {
            if HOP_BY_HOP_RESPONSE.contains(name) {
                continue;
            }
            if name == header::CONTENT_TYPE {
                content_type_ok = !value
                    .to_str()
                    .map(|v| v.contains("octet-stream"))
                    .unwrap_or(true);
            }
            headers.append(name.clone(), value.clone());
        }

        // Backends sometimes mislabel PHP output; force HTML in that case.
        if is_php && !content_type_ok {
            headers.insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("text/html"),
            );
        }
    }

    relayed
        .body(Body::new(body))
        .unwrap_or_else(|_| backend_error("malformed backend response"))
}

/// 500 with a short human-readable body; backend failures never crash the
/// worker.
fn backend_error(reason: &str) -> Response {
    let body = format!(
        "<html><body><h1>Error</h1><p>Failed to proxy request: {reason}.</p></body></html>"
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}
