//! `multipart/form-data` decoding.
//!
//! # Responsibilities
//! - Locate delimiter lines for a given boundary
//! - Parse each part's header block
//! - Classify parts as fields, files, or skipped
//!
//! # Design Decisions
//! - Purpose-built scanner over the whole buffered body, no MIME envelope
//!   grammar
//! - A delimiter only counts at the start of a line and when followed by
//!   `--`, optional whitespace and a line break, or end of input
//! - Parts without `form-data` disposition or without a name are skipped,
//!   not rejected
//! - A missing closing delimiter is tolerated; the last part runs to the end
//!
//! # Limitations
//! - `Content-Transfer-Encoding` (`base64`, `quoted-printable`) is not
//!   decoded. Part payloads are delivered exactly as sent and the header is
//!   left in `UploadedFile::headers` for callers that need it
//! - RFC 2231 extended parameters (`filename*=`) are not interpreted

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::{BoundaryError, Result};
use crate::form::charset;
use crate::form::data::{FormData, UploadedFile};
use crate::http::content_type::{HeaderParams, MediaType};

/// A delimiter line found in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delimiter {
    /// End of the preceding part's content (the line break before the
    /// delimiter belongs to the delimiter).
    content_end: usize,
    /// First byte after the delimiter line.
    next: usize,
    /// `--boundary--`
    closing: bool,
}

/// One undecoded part.
#[derive(Debug)]
struct RawPart<'a> {
    headers: HashMap<String, String>,
    body: &'a [u8],
}

/// Decode `body` split on `boundary`.
pub fn parse_multipart(body: &Bytes, boundary: &str) -> Result<FormData> {
    let parts = split_parts(body, boundary.as_bytes())?;
    let mut form = FormData::new();

    for part in parts {
        let media = MediaType::parse(part.headers.get("content-type").map(String::as_str));
        if media.is_multipart() {
            return Err(BoundaryError::NestedMultipartUnsupported);
        }

        let Some(disposition) = part.headers.get("content-disposition") else {
            tracing::debug!("Skipping multipart part without Content-Disposition");
            continue;
        };
        let disposition = HeaderParams::parse(disposition);
        if disposition.value != "form-data" {
            tracing::debug!(disposition = %disposition.value, "Skipping non form-data part");
            continue;
        }
        let Some(name) = disposition.param("name").filter(|n| !n.is_empty()) else {
            tracing::debug!("Skipping multipart part without a name");
            continue;
        };

        // Zero-copy view into the shared body buffer.
        let payload = body.slice_ref(part.body);

        match disposition.param("filename").filter(|f| !f.is_empty()) {
            Some(filename) => {
                let content_type = Some(media.essence())
                    .filter(|essence| !essence.is_empty())
                    .map(str::to_owned);
                form.push_file(UploadedFile::new(
                    name,
                    filename,
                    payload,
                    content_type,
                    part.headers,
                ));
            }
            None => {
                let charset = media.param("charset").unwrap_or("utf-8");
                let value = charset::decode(&payload, charset)
                    .ok_or_else(BoundaryError::invalid_multipart_encoding)?;
                form.push_field(name.to_owned(), value);
            }
        }
    }

    Ok(form)
}

fn split_parts<'a>(body: &'a [u8], boundary: &[u8]) -> Result<Vec<RawPart<'a>>> {
    let mut delimiter = Vec::with_capacity(boundary.len() + 2);
    delimiter.extend_from_slice(b"--");
    delimiter.extend_from_slice(boundary);

    let Some(mut current) = find_delimiter(body, &delimiter, 0) else {
        tracing::debug!("No opening multipart delimiter found");
        return Err(BoundaryError::MalformedMultipart);
    };

    let mut parts = Vec::new();
    while !current.closing {
        let (headers, content_start) = parse_headers(body, current.next)?;
        let next = find_delimiter(body, &delimiter, content_start);
        let content_end = next.map_or(body.len(), |d| d.content_end);

        parts.push(RawPart {
            headers,
            body: &body[content_start..content_end.max(content_start)],
        });

        match next {
            Some(d) => current = d,
            None => {
                tracing::debug!("Multipart body ended without closing delimiter");
                break;
            }
        }
    }

    Ok(parts)
}

/// Find the next delimiter line at or after `from`.
fn find_delimiter(body: &[u8], delimiter: &[u8], from: usize) -> Option<Delimiter> {
    let mut search = from;
    while search + delimiter.len() <= body.len() {
        let offset = body[search..]
            .windows(delimiter.len())
            .position(|window| window == delimiter)?;
        let start = search + offset;
        search = start + 1;

        let at_line_start = start == from || (start > 0 && body[start - 1] == b'\n');
        if !at_line_start {
            continue;
        }

        let mut cursor = start + delimiter.len();
        let closing = body[cursor..].starts_with(b"--");
        if closing {
            cursor += 2;
        }
        while cursor < body.len() && matches!(body[cursor], b' ' | b'\t') {
            cursor += 1;
        }
        let next = if body[cursor..].starts_with(b"\r\n") {
            cursor + 2
        } else if body[cursor..].starts_with(b"\n") || cursor == body.len() {
            (cursor + 1).min(body.len())
        } else if closing {
            // Epilogue may follow the closing delimiter on the same line.
            cursor
        } else {
            continue;
        };

        let content_end = if body[..start].ends_with(b"\r\n") {
            start - 2
        } else if body[..start].ends_with(b"\n") {
            start - 1
        } else {
            start
        };

        return Some(Delimiter {
            content_end,
            next,
            closing,
        });
    }
    None
}

/// Parse the header block starting at `start`. Returns the headers and the
/// offset of the first content byte.
fn parse_headers(body: &[u8], start: usize) -> Result<(HashMap<String, String>, usize)> {
    let mut headers: HashMap<String, String> = HashMap::new();
    let mut last_name: Option<String> = None;
    let mut pos = start;

    loop {
        let Some(line_len) = body[pos..].iter().position(|&b| b == b'\n') else {
            tracing::debug!("Multipart part headers are not terminated");
            return Err(BoundaryError::MalformedMultipart);
        };
        let raw = &body[pos..pos + line_len];
        let line = raw.strip_suffix(b"\r").unwrap_or(raw);
        pos += line_len + 1;

        if line.is_empty() {
            return Ok((headers, pos));
        }

        let line = header_text(line);
        if line.starts_with(|c: char| c == ' ' || c == '\t') {
            // Folded continuation of the previous header.
            if let Some(value) = last_name.as_ref().and_then(|name| headers.get_mut(name)) {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        match line.split_once(':') {
            Some((name, value)) => {
                let name = name.trim().to_ascii_lowercase();
                headers.insert(name.clone(), value.trim().to_string());
                last_name = Some(name);
            }
            None => {
                tracing::debug!("Ignoring multipart header line without a colon");
                last_name = None;
            }
        }
    }
}

/// Header bytes as text: UTF-8 when valid (browsers send raw UTF-8
/// filenames), latin-1 otherwise.
fn header_text(line: &[u8]) -> String {
    match std::str::from_utf8(line) {
        Ok(text) => text.to_owned(),
        Err(_) => line.iter().map(|&b| char::from(b)).collect(),
    }
}
