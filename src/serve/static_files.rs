//! Static file responder, confined to the shared root.
//!
//! # Responsibilities
//! - Map the prefix-stripped, decoded path to a file under the root
//! - Serve the landing page at the subtree root when no index file exists
//! - Redirect directories to their slash-suffixed form
//! - Infer a best-effort content type from the file extension
//!
//! `.php` files are served as opaque bytes with their literal static
//! content; execution requires proxy mode.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

use crate::http::AppState;
use crate::serve::paths;

const NOT_FOUND_BODY: &str =
    "<html><body><h1>404 Not Found</h1><p>File not found.</p></body></html>";

const FORBIDDEN_BODY: &str = "<html><body><h1>403 Forbidden</h1>\
<p>Access is restricted to the shared directory.</p></body></html>";

/// Serve a confined request path from the shared directory.
///
/// `path` is decoded and prefix-stripped, always starting with `/`.
/// `original_path` and `query` are taken from the client's raw URI and
/// used for redirect targets.
pub async fn serve(
    state: &AppState,
    path: &str,
    original_path: &str,
    query: Option<&str>,
) -> Response {
    let root = &state.config.root_dir;

    let candidate = match paths::resolve_within_root(root, path) {
        Some(p) => p,
        None => {
            tracing::warn!(path = %path, "Security block: path traversal attempt");
            return (StatusCode::FORBIDDEN, Html(FORBIDDEN_BODY)).into_response();
        }
    };

    // Landing page at the subtree root when no index file exists.
    if path == "/" {
        return match paths::find_index(root) {
            Some(index) => stream_file(state, &root.join(index)).await,
            None => {
                (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "text/html")],
                    Body::from(state.landing_page.clone()),
                )
                    .into_response()
            }
        };
    }

    let metadata = match tokio::fs::metadata(&candidate).await {
        Ok(m) => m,
        Err(_) => return not_found(),
    };

    if metadata.is_dir() {
        if !original_path.ends_with('/') {
            let location = match query {
                Some(q) => format!("{original_path}/?{q}"),
                None => format!("{original_path}/"),
            };
            return (
                StatusCode::MOVED_PERMANENTLY,
                [(header::LOCATION, location)],
            )
                .into_response();
        }
        // Serve a directory's own index file if it has one; no listings.
        for index in paths::INDEX_FILES {
            let index_path = candidate.join(index);
            if index_path.is_file() {
                return stream_file(state, &index_path).await;
            }
        }
        return not_found();
    }

    stream_file(state, &candidate).await
}

/// Stream a regular file with an extension-inferred content type.
///
/// The symlink check runs here, on the final path actually opened: anything
/// that resolves outside the root fails closed as 404.
async fn stream_file(state: &AppState, path: &std::path::Path) -> Response {
    let root = &state.config.root_dir;
    let confined = match paths::confine_existing(root, path) {
        Some(p) => p,
        None => {
            tracing::warn!(path = %path.display(), "Security block: resolved path escapes shared root");
            return not_found();
        }
    };

    let file = match tokio::fs::File::open(&confined).await {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(path = %confined.display(), error = %e, "Failed to open file");
            return not_found();
        }
    };

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(&confined));
    if let Ok(metadata) = file.metadata().await {
        response = response.header(header::CONTENT_LENGTH, metadata.len());
    }

    response
        .body(Body::from_stream(ReaderStream::new(file)))
        .unwrap_or_else(|_| not_found())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response()
}

/// Best-effort content type from the file extension.
fn content_type(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=UTF-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" | "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=UTF-8",
        // Served as literal bytes; PHP never executes in static mode.
        "php" => "text/plain; charset=UTF-8",
        _ => "application/octet-stream",
    }
}
