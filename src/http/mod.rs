//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeouts, trace layer)
//!     → serve::router (confinement + dispatch)
//!     → {static_files | proxy} responder
//!     → Send to client
//! ```

pub mod landing;
pub mod server;

pub use server::{AppState, HttpServer};
