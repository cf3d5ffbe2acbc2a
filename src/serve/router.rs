//! Request routing: info endpoint, confinement, mode dispatch.
//!
//! # Responsibilities
//! - Serve `/siteshare-info.json` before any other rule
//! - Enforce the shared-subtree confinement (302 for `/`, 403 outside)
//! - Reject malformed percent-encoding with 400
//! - Dispatch to the responder for the startup-fixed mode
//!
//! # Design Decisions
//! - Mode is a plain enum matched per request; no per-request mutable state
//! - Confinement runs before either responder sees the path

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::config::ServeMode;
use crate::http::AppState;
use crate::serve::{paths, proxy, static_files};

/// Reserved path describing the running share session.
pub const INFO_PATH: &str = "/siteshare-info.json";

const FORBIDDEN_BODY: &str = "<html><body><h1>403 Forbidden</h1>\
<p>Access is restricted to the shared directory.</p></body></html>";

const BAD_REQUEST_BODY: &str = "<html><body><h1>400 Bad Request</h1>\
<p>Malformed request path.</p></body></html>";

/// Route a single request to the configured responder.
///
/// Every error is converted into a well-formed HTTP response here or in the
/// responders; nothing propagates out of the worker.
pub async fn route(state: &AppState, request: Request<Body>) -> Response {
    let raw_path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    // The info endpoint bypasses confinement entirely.
    if raw_path == INFO_PATH {
        return info_response(state);
    }

    let decoded = match paths::decode_path(&raw_path) {
        Some(p) => p,
        None => {
            tracing::debug!(path = %raw_path, "Rejecting malformed percent-encoding");
            return (StatusCode::BAD_REQUEST, Html(BAD_REQUEST_BODY)).into_response();
        }
    };

    // Confinement: the shared directory's basename must prefix every path.
    // Sharing the filesystem root itself leaves nothing to confine.
    let (stripped_raw, stripped_decoded) = match state.config.base_dir_name() {
        Some(base) => {
            let prefix = format!("/{base}");
            let subtree = format!("{prefix}/");

            if raw_path == "/" {
                return redirect(StatusCode::FOUND, &subtree, query.as_deref());
            }
            if raw_path == prefix {
                // Directory without trailing slash, standard redirect.
                return redirect(StatusCode::MOVED_PERMANENTLY, &subtree, query.as_deref());
            }
            if !raw_path.starts_with(&subtree) {
                tracing::warn!(path = %raw_path, base = %base,
                    "Security block: request outside of shared directory");
                return (StatusCode::FORBIDDEN, Html(FORBIDDEN_BODY)).into_response();
            }

            (
                paths::strip_share_prefix(&raw_path, &base).to_string(),
                paths::strip_share_prefix(&decoded, &base).to_string(),
            )
        }
        None => (raw_path.clone(), decoded),
    };

    match state.config.mode {
        ServeMode::Static => {
            static_files::serve(state, &stripped_decoded, &raw_path, query.as_deref()).await
        }
        ServeMode::PhpProxy => proxy::serve(state, &stripped_raw, request).await,
    }
}

/// 200 JSON description of the running session.
fn info_response(state: &AppState) -> Response {
    let config = &state.config;
    Json(serde_json::json!({
        "directory": config.root_dir.display().to_string(),
        "version": crate::VERSION,
        "mode": config.mode.as_str(),
        "php_port": config.backend_port,
    }))
    .into_response()
}

// Redirects carry the original query string so `GET /?x=1` lands on
// `/{base}/?x=1` rather than dropping the parameters.
fn redirect(status: StatusCode, location: &str, query: Option<&str>) -> Response {
    let target = match query {
        Some(q) => format!("{location}?{q}"),
        None => location.to_string(),
    };
    (status, [(header::LOCATION, target)]).into_response()
}
