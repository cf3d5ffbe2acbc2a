//! Request routing and responders.
//!
//! # Data Flow
//! ```text
//! Incoming request (raw path, headers, body)
//!     → router.rs (info endpoint, confinement check, mode dispatch)
//!     → paths.rs (percent-decode, prefix strip, root-relative resolution)
//!     → static_files.rs  (Static mode: confined filesystem serving)
//!       or proxy.rs      (PhpProxy mode: forward to the local PHP backend)
//! ```
//!
//! # Confinement discipline
//! The shared directory's basename is a mandatory URL prefix: `/` redirects
//! to `/{basename}/`, anything outside `/{basename}/...` is refused with
//! 403, and both responders receive the path with the prefix already
//! stripped. The same rule applies in both modes; requests never mix
//! prefixed and unprefixed forms. When the shared directory is the
//! filesystem root itself there is no basename and paths are served as-is.

pub mod paths;
pub mod proxy;
pub mod router;
pub mod static_files;
