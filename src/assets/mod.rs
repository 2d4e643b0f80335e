//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! request path
//!     → directory.rs (strip mount prefix)
//!     → path.rs (string rules, then canonical resolution inside the root)
//!     → response.rs (stat → ETag / Last-Modified → 304 or full body)
//!     → mime.rs (content type + content encoding from extensions)
//! ```
//!
//! # Design Decisions
//! - Mounts are built once from config and never mutated
//! - Whole-file reads; no range requests
//! - Every failure reaches the client as 404

pub mod directory;
pub mod mime;
pub mod path;
pub mod response;

pub use directory::{StaticConfigError, StaticDirectory};
pub use response::{build_static_response, serve_static, StaticResponse};
