//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags override file values
//!     → validation.rs (semantic checks)
//!     → ShareConfig (validated, immutable)
//!     → shared via Arc to both responders
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts; responders never mutate it
//! - All fields have defaults so the tool runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ServeMode;
pub use schema::ShareConfig;
pub use schema::TimeoutConfig;
