//! Request-scoped error taxonomy.
//!
//! # Responsibilities
//! - Name every way a body read, form decode or static lookup can fail
//! - Map each kind onto the status code an outer layer should answer with
//!
//! # Design Decisions
//! - Errors carry a kind and a human-readable message, never a response
//! - Static serving collapses every failure into `NotFound`
//! - Messages never include filesystem paths

use axum::http::StatusCode;
use thiserror::Error;

/// Result alias for boundary operations.
pub type Result<T> = std::result::Result<T, BoundaryError>;

/// Errors surfaced by the message boundary layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The transport disconnected before the final body fragment.
    #[error("Client disconnected")]
    ClientDisconnected,

    /// Cumulative body bytes exceeded the configured ceiling.
    #[error("Payload Too Large")]
    PayloadTooLarge,

    /// Bytes could not be decoded with the declared charset.
    #[error("{detail}")]
    InvalidEncoding { detail: &'static str },

    /// `multipart/form-data` without a `boundary` parameter.
    #[error("Missing multipart boundary")]
    MissingBoundary,

    /// The multipart body could not be split into parts.
    #[error("Malformed multipart form data")]
    MalformedMultipart,

    /// A part of a multipart body was itself multipart.
    #[error("Nested multipart form data is not supported")]
    NestedMultipartUnsupported,

    /// The body was not valid JSON for the requested type.
    #[error("Invalid JSON body")]
    InvalidJson,

    /// Static asset missing or rejected.
    #[error("Not Found")]
    NotFound,
}

impl BoundaryError {
    /// Error for an undecodable `application/x-www-form-urlencoded` body.
    pub const fn invalid_form_encoding() -> Self {
        Self::InvalidEncoding {
            detail: "Invalid form encoding",
        }
    }

    /// Error for an undecodable multipart field part.
    pub const fn invalid_multipart_encoding() -> Self {
        Self::InvalidEncoding {
            detail: "Invalid multipart form encoding",
        }
    }

    /// Stable machine-readable kind, for logs and error translators.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClientDisconnected => "client_disconnected",
            Self::PayloadTooLarge => "payload_too_large",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::MissingBoundary => "missing_boundary",
            Self::MalformedMultipart => "malformed_multipart",
            Self::NestedMultipartUnsupported => "nested_multipart_unsupported",
            Self::InvalidJson => "invalid_json",
            Self::NotFound => "not_found",
        }
    }

    /// Default HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
