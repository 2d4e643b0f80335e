//! HTTP message boundary layer: request body ingestion, form decoding and
//! static asset serving.

pub mod assets;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod testing;

pub use assets::directory::StaticDirectory;
pub use assets::response::StaticResponse;
pub use config::schema::BoundaryConfig;
pub use error::BoundaryError;
pub use form::{FormData, UploadedFile};
pub use http::{HttpServer, Request};
pub use lifecycle::Shutdown;
