//! Response helpers for the Axum adapter.
//!
//! # Responsibilities
//! - Describe a decoded form as JSON (fields and file metadata)
//! - Translate `BoundaryError` into a plain-text error response
//!
//! # Design Decisions
//! - File payloads are never echoed back, only name, type and size

use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::BoundaryError;
use crate::form::{FormData, UploadedFile};

/// Metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub filename: String,
    pub content_type: Option<String>,
    pub size: usize,
}

impl From<&UploadedFile> for FileSummary {
    fn from(file: &UploadedFile) -> Self {
        Self {
            filename: file.filename().to_string(),
            content_type: file.content_type().map(str::to_string),
            size: file.size(),
        }
    }
}

/// JSON view of a decoded form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub fields: BTreeMap<String, Vec<String>>,
    pub files: BTreeMap<String, Vec<FileSummary>>,
}

impl From<&FormData> for FormSummary {
    fn from(form: &FormData) -> Self {
        let fields = form
            .keys()
            .map(|name| {
                let values = form.getlist(name).into_iter().map(str::to_string).collect();
                (name.to_string(), values)
            })
            .collect();
        let files = form
            .files()
            .map(|(name, files)| (name.to_string(), files.iter().map(FileSummary::from).collect()))
            .collect();
        Self { fields, files }
    }
}

impl IntoResponse for BoundaryError {
    fn into_response(self) -> Response {
        tracing::debug!(kind = self.kind(), "Request rejected");
        (self.status_code(), self.to_string()).into_response()
    }
}
