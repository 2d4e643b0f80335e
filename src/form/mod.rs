//! Form decoding subsystem.
//!
//! # Data Flow
//! ```text
//! Content-Type header
//!     → http::content_type (media type + params)
//!     → FormEncoding::negotiate (pick decoder, check boundary)
//!     → request body (read once)
//!     → urlencoded.rs | multipart.rs
//!     → FormData (memoized on the request)
//! ```
//!
//! # Design Decisions
//! - Negotiation fails before the body is touched, so a missing boundary
//!   never costs a body read
//! - Unsupported media types decode to an empty form, not an error

pub mod charset;
pub mod data;
pub mod multipart;
pub mod urlencoded;

use bytes::Bytes;

use crate::error::{BoundaryError, Result};
use crate::http::content_type::MediaType;
use crate::observability::metrics;

pub use data::{FormData, UploadedFile};

pub const URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Decoder selected from a request's media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding<'a> {
    UrlEncoded { charset: &'a str },
    Multipart { boundary: &'a str },
    /// Anything else; decodes to an empty form without reading the body.
    Unsupported,
}

impl<'a> FormEncoding<'a> {
    /// Pick a decoder for `media`. Fails with `MissingBoundary` for
    /// multipart without a usable boundary.
    pub fn negotiate(media: &'a MediaType) -> Result<Self> {
        match media.essence() {
            URLENCODED => Ok(Self::UrlEncoded {
                charset: media.param("charset").unwrap_or("utf-8"),
            }),
            MULTIPART_FORM_DATA => match media.param("boundary").filter(|b| !b.is_empty()) {
                Some(boundary) => Ok(Self::Multipart { boundary }),
                None => Err(BoundaryError::MissingBoundary),
            },
            _ => Ok(Self::Unsupported),
        }
    }

    /// Whether decoding needs the request body.
    pub fn reads_body(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    pub fn decode(&self, body: &Bytes) -> Result<FormData> {
        let form = match *self {
            Self::UrlEncoded { charset } => urlencoded::parse_urlencoded(body, charset)?,
            Self::Multipart { boundary } => multipart::parse_multipart(body, boundary)?,
            Self::Unsupported => FormData::new(),
        };
        tracing::debug!(
            kind = self.label(),
            fields = form.len(),
            files = form.files().count(),
            "Form decoded"
        );
        metrics::record_form_decoded(self.label());
        Ok(form)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UrlEncoded { .. } => "urlencoded",
            Self::Multipart { .. } => "multipart",
            Self::Unsupported => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiates_urlencoded_charset() {
        let media = MediaType::parse(Some("application/x-www-form-urlencoded; charset=latin-1"));
        assert_eq!(
            FormEncoding::negotiate(&media).unwrap(),
            FormEncoding::UrlEncoded { charset: "latin-1" }
        );

        let media = MediaType::parse(Some("application/x-www-form-urlencoded"));
        assert_eq!(
            FormEncoding::negotiate(&media).unwrap(),
            FormEncoding::UrlEncoded { charset: "utf-8" }
        );
    }

    #[test]
    fn multipart_requires_boundary() {
        for header in ["multipart/form-data", "multipart/form-data; boundary=", "multipart/form-data; boundary=\"\""] {
            let media = MediaType::parse(Some(header));
            assert_eq!(
                FormEncoding::negotiate(&media).unwrap_err(),
                BoundaryError::MissingBoundary,
                "{header}"
            );
        }
    }

    #[test]
    fn other_types_decode_to_empty_form() {
        let media = MediaType::parse(Some("application/json"));
        let encoding = FormEncoding::negotiate(&media).unwrap();
        assert!(!encoding.reads_body());

        let form = encoding.decode(&Bytes::from_static(b"{\"a\":1}")).unwrap();
        assert!(form.is_empty());
    }
}
