//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Wire up middleware (request timeout, tracing)
//! - Build the outbound client used by the proxy responder
//! - Run the accept loop on an already-bound listener
//!
//! The interesting decisions (confinement, static vs. proxy dispatch) live
//! in [`crate::serve`]; this module only provides the plumbing around them.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::Request,
    response::IntoResponse,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ShareConfig;
use crate::http::landing;
use crate::serve;

/// Application state injected into the handler.
///
/// Read-only for the lifetime of the server; nothing here is mutated per
/// request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ShareConfig>,
    pub client: Client<HttpConnector, Body>,
    pub landing_page: Bytes,
}

/// HTTP server for a share session.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ShareConfig) -> Self {
        let landing_page = landing::load(config.landing_page.as_deref());

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            config: Arc::new(config),
            client,
            landing_page,
        };

        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);
        Router::new()
            .route("/{*path}", any(share_handler))
            .route("/", any(share_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point for every request; the serve router decides what
/// happens from here.
async fn share_handler(State(state): State<AppState>, request: Request<Body>) -> impl IntoResponse {
    serve::router::route(&state, request).await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        // Without a handler there is no signal to wait for; park forever
        // rather than shutting down a healthy server.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
