//! SiteShare: share a local website directory across your network.
//!
//! Binds an HTTP listener and serves a chosen directory's static files to
//! other devices on the same LAN. With `--php`, requests are instead proxied
//! to a locally running PHP-capable server (MAMP, XAMPP, ...) so PHP pages
//! render correctly when accessed remotely.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌─────────────────────────────────────────────┐
//!                    │                  SITESHARE                  │
//!                    │                                             │
//!  Client Request    │  ┌─────────┐   ┌─────────┐   ┌───────────┐ │
//!  ──────────────────┼─▶│   net   │──▶│  http   │──▶│   serve   │ │
//!                    │  │listener │   │ server  │   │  router   │ │
//!                    │  └─────────┘   └─────────┘   └─────┬─────┘ │
//!                    │                                    │       │
//!                    │                   ┌────────────────┴─────┐ │
//!                    │                   ▼                      ▼ │
//!                    │           ┌──────────────┐   ┌───────────┐ │
//!  Client Response   │           │ static_files │   │   proxy   │─┼──▶ PHP backend
//!  ◀─────────────────┼───────────│  responder   │   │ responder │ │    (127.0.0.1)
//!                    │           └──────────────┘   └───────────┘ │
//!                    │                                            │
//!                    │  ┌────────────────────────────────────────┐│
//!                    │  │         Cross-Cutting Concerns         ││
//!                    │  │  ┌────────┐ ┌────────┐ ┌─────────────┐ ││
//!                    │  │  │ config │ │ detect │ │ cli /ipinfo │ ││
//!                    │  │  └────────┘ └────────┘ └─────────────┘ ││
//!                    │  └────────────────────────────────────────┘│
//!                    └─────────────────────────────────────────────┘
//! ```
//!
//! The serving mode (static vs. PHP proxy) is decided once at startup from
//! the CLI flags and the backend detector's result; the router dispatches on
//! that fixed mode for the lifetime of the process. Every request is
//! confined to the shared directory's subtree before either responder runs.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod serve;

// Startup-time collaborators
pub mod cli;
pub mod detect;

pub use config::schema::ShareConfig;
pub use http::HttpServer;

/// SiteShare version reported on the info endpoint and in the banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
