//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → listener.rs (bind, classify bind errors, retry budget)
//!     → Hand off the bound TcpListener to the HTTP layer
//!
//! display
//!     → ipinfo.rs (detect the LAN address other devices should use)
//! ```
//!
//! # Design Decisions
//! - Bind errors are classified so the CLI can distinguish "pick another
//!   port" (AddressInUse) from terminal failures (PermissionDenied)
//! - LAN IP detection is display-only and never affects correctness

pub mod ipinfo;
pub mod listener;

pub use listener::{bind_listener, BindError};
