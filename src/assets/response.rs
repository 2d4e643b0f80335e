//! Static asset responses with conditional-GET support.
//!
//! # Responsibilities
//! - Derive a validator from a file's mtime and size
//! - Short-circuit to 304 when `If-None-Match` matches
//! - Otherwise read the whole file and describe it (type, encoding, length)
//!
//! # Design Decisions
//! - Header names are lower-cased, values are plain strings
//! - The HEAD variant is derived from the GET response, never recomputed
//! - Filesystem errors after resolution are reported as `NotFound`

use std::fs::Metadata;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::assets::directory::StaticDirectory;
use crate::assets::{mime, path};
use crate::error::{BoundaryError, Result};
use crate::observability::metrics;

/// A fully built static response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl StaticResponse {
    /// First value of a header by lower-cased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Same status and headers, no body.
    pub fn head(&self) -> Self {
        Self {
            status: self.status,
            headers: self.headers.clone(),
            body: Bytes::new(),
        }
    }

    /// Keep the body for GET, drop it for HEAD.
    pub fn for_method(self, method: &Method) -> Self {
        if method == Method::HEAD {
            self.head()
        } else {
            self
        }
    }
}

impl IntoResponse for StaticResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping unrepresentable header"),
            }
        }
        response
    }
}

/// Validator for a file: hex mtime in nanoseconds, `-`, hex size.
pub fn etag_for(metadata: &Metadata) -> String {
    let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
    format!("\"{}-{:x}\"", hex_nanos(modified), metadata.len())
}

fn hex_nanos(time: SystemTime) -> String {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => format!("{:x}", after.as_nanos()),
        Err(before) => format!("-{:x}", before.duration().as_nanos()),
    }
}

/// RFC 1123 date in GMT.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Build the response for an already resolved file.
pub fn build_file_response(
    directory: &StaticDirectory,
    resolved: &Path,
    if_none_match: Option<&str>,
) -> Result<StaticResponse> {
    let metadata = std::fs::metadata(resolved).map_err(|_| BoundaryError::NotFound)?;
    let etag = etag_for(&metadata);
    let last_modified = http_date(metadata.modified().unwrap_or(UNIX_EPOCH));

    let mut headers = vec![
        ("cache-control".to_string(), directory.cache_control()),
        ("etag".to_string(), etag.clone()),
        ("last-modified".to_string(), last_modified),
    ];

    if if_none_match == Some(etag.as_str()) {
        metrics::record_static_response(304);
        return Ok(StaticResponse {
            status: 304,
            headers,
            body: Bytes::new(),
        });
    }

    let payload = std::fs::read(resolved).map_err(|e| {
        tracing::debug!(error = %e, "Static file vanished or became unreadable");
        BoundaryError::NotFound
    })?;

    let guess = mime::guess(resolved);
    headers.push((
        "content-type".to_string(),
        guess.media_type_or_default().to_string(),
    ));
    if let Some(encoding) = guess.encoding {
        headers.push(("content-encoding".to_string(), encoding.to_string()));
    }
    headers.push(("content-length".to_string(), payload.len().to_string()));

    metrics::record_static_response(200);
    Ok(StaticResponse {
        status: 200,
        headers,
        body: Bytes::from(payload),
    })
}

/// Resolve `filename` (already stripped of the mount prefix) and build its
/// response.
pub fn build_static_response(
    directory: &StaticDirectory,
    filename: &str,
    if_none_match: Option<&str>,
) -> Result<StaticResponse> {
    let resolved = path::resolve(directory, filename).map_err(|e| {
        tracing::debug!(url_path = %directory.url_path(), "Static path rejected");
        metrics::record_static_response(404);
        e
    })?;
    build_file_response(directory, &resolved, if_none_match)
}

/// Serve a full request path (mount prefix included).
pub fn serve_static(
    directory: &StaticDirectory,
    request_path: &str,
    if_none_match: Option<&str>,
) -> Result<StaticResponse> {
    let filename = directory
        .strip_prefix(request_path)
        .ok_or(BoundaryError::NotFound)?;
    build_static_response(directory, filename, if_none_match)
}
