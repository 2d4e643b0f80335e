//! HTTP message boundary subsystem.
//!
//! # Data Flow
//! ```text
//! Axum body
//!     → transport.rs (BodyMessage stream)
//!     → body.rs (accumulate with ceiling)
//!     → request.rs (cache body, negotiate, decode form)
//!     → content_type.rs (media type + params)
//!     → form/ (urlencoded or multipart → FormData)
//!
//! server.rs wires the router; response.rs turns results into Axum responses.
//! ```

pub mod body;
pub mod content_type;
pub mod request;
pub mod response;
pub mod server;
pub mod transport;

pub use content_type::MediaType;
pub use request::Request;
pub use server::HttpServer;
pub use transport::BodyMessage;
