//! `Content-Type` negotiation.
//!
//! # Responsibilities
//! - Split a header value into a media type and its parameters
//! - Unquote quoted parameter values
//!
//! # Design Decisions
//! - Never fails: garbage degrades to an empty media type
//! - Keys and the media type are lower-cased, values keep their case
//! - The parameter grammar is shared with `Content-Disposition`

use std::collections::HashMap;

/// A parsed `type/subtype; key=value` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaType {
    essence: String,
    params: HashMap<String, String>,
}

impl MediaType {
    /// Parse a header value. `None` and empty strings produce an empty type.
    pub fn parse(header: Option<&str>) -> Self {
        let Some(header) = header.map(str::trim).filter(|h| !h.is_empty()) else {
            return Self::default();
        };

        let mut segments = split_params(header).into_iter();
        let essence = segments.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !is_valid_essence(&essence) {
            tracing::trace!("Unparseable media type, treating as empty");
            return Self::default();
        }

        Self {
            essence,
            params: collect_params(segments),
        }
    }

    /// Lower-cased `type/subtype`, or empty.
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// Parameter value by lower-cased key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All parameters.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// True for `multipart/*`.
    pub fn is_multipart(&self) -> bool {
        self.essence.starts_with("multipart/")
    }
}

/// A header value of the form `token; key=value; ...`, as used by
/// `Content-Disposition`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderParams {
    /// Lower-cased leading token.
    pub value: String,
    /// Lower-cased keys, unquoted values.
    pub params: HashMap<String, String>,
}

impl HeaderParams {
    pub fn parse(header: &str) -> Self {
        let mut segments = split_params(header).into_iter();
        let value = segments.next().unwrap_or_default().trim().to_ascii_lowercase();
        Self {
            value,
            params: collect_params(segments),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

fn is_valid_essence(essence: &str) -> bool {
    match essence.split_once('/') {
        Some((kind, subtype)) => is_token(kind) && is_token(subtype),
        None => false,
    }
}

/// Split on `;` outside of quoted strings.
fn split_params(header: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&header[start..]);
    segments
}

fn collect_params<'a>(segments: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for segment in segments {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        if !is_token(&key) {
            continue;
        }
        let Some(value) = unquote(value.trim()) else {
            continue;
        };
        params.entry(key).or_insert(value);
    }
    params
}

/// Strip surrounding quotes and backslash escapes. Unterminated quotes are
/// malformed.
fn unquote(value: &str) -> Option<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Some(value.to_string());
    };
    let inner = inner.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}
