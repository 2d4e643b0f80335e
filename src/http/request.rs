//! Per-exchange request value.
//!
//! # Responsibilities
//! - Expose method, path, query, scheme, headers and client address
//! - Drain the transport into a body buffer at most once
//! - Negotiate and decode the form at most once
//!
//! # Design Decisions
//! - Headers are decoded as latin-1 so no value ever fails to decode
//! - Duplicate header names keep the last value
//! - The body cache lives in an explicit private state tag; the decoded
//!   form sits beside it, set once
//! - A failed drain is remembered; the transport is never read twice
//!
//! # Data Flow
//! ```text
//! Unread ──body()──▶ BodyCached ──form()──▶ BodyCached + form
//!   │                                             ▲
//!   └──form() on a media type without a body ─────┘ (Unread + form)
//! ```

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::request::Parts;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{BoundaryError, Result};
use crate::form::{charset, urlencoded, FormData, FormEncoding};
use crate::http::body;
use crate::http::content_type::MediaType;
use crate::http::transport::BoxedSource;

enum BodyState {
    Unread,
    BodyCached(Bytes),
    Failed(BoundaryError),
}

/// An inbound HTTP exchange as seen by handlers.
pub struct Request {
    method: String,
    path: String,
    query_string: String,
    scheme: String,
    headers: HashMap<String, String>,
    client: Option<SocketAddr>,
    source: BoxedSource,
    body_limit: Option<usize>,
    state: BodyState,
    form: Option<FormData>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query_string", &self.query_string)
            .field("scheme", &self.scheme)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl Request {
    /// A request for `method path` reading its body from `source`.
    pub fn new(method: &str, path: impl Into<String>, source: BoxedSource) -> Self {
        let method = method.trim().to_ascii_uppercase();
        Self {
            method: if method.is_empty() { "GET".to_string() } else { method },
            path: path.into(),
            query_string: String::new(),
            scheme: "http".to_string(),
            headers: HashMap::new(),
            client: None,
            source,
            body_limit: None,
            state: BodyState::Unread,
            form: None,
        }
    }

    /// Build from Axum request parts. The client address is taken from
    /// `ConnectInfo` when the server installed it.
    pub fn from_parts(parts: &Parts, source: BoxedSource) -> Self {
        let mut request = Self::new(parts.method.as_str(), parts.uri.path(), source)
            .with_query(parts.uri.query().unwrap_or_default())
            .with_scheme(parts.uri.scheme_str().unwrap_or_default());
        for (name, value) in &parts.headers {
            request = request.with_header(name.as_str(), value.as_bytes());
        }
        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            request = request.with_client(*addr);
        }
        request
    }

    pub fn with_query(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = query_string.into();
        self
    }

    /// Trimmed and lower-cased; blank means `http`.
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        let scheme = scheme.trim().to_ascii_lowercase();
        self.scheme = if scheme.is_empty() { "http".to_string() } else { scheme };
        self
    }

    /// Add a header from raw bytes. Later values replace earlier ones.
    pub fn with_header(mut self, name: &str, value: impl AsRef<[u8]>) -> Self {
        let value = value.as_ref().iter().map(|&b| char::from(b)).collect();
        self.headers.insert(name.to_ascii_lowercase(), value);
        self
    }

    pub fn with_client(mut self, client: SocketAddr) -> Self {
        self.client = Some(client);
        self
    }

    /// Ceiling on cumulative body bytes.
    pub fn with_body_limit(mut self, limit: Option<usize>) -> Self {
        self.body_limit = limit;
        self
    }

    /// Upper-cased method.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Lower-cased media type of the body, empty when absent.
    pub fn content_type(&self) -> String {
        MediaType::parse(self.header("content-type"))
            .essence()
            .to_string()
    }

    /// Query parameters, blank values kept, repeated names accumulated.
    pub fn query_params(&self) -> FormData {
        FormData::from_parts(urlencoded::parse_pairs(&self.query_string), std::iter::empty())
    }

    /// `name=value` pairs from the `Cookie` header. Items without `=` are
    /// dropped.
    pub fn cookies(&self) -> HashMap<String, String> {
        let Some(header) = self.header("cookie") else {
            return HashMap::new();
        };
        header
            .split(';')
            .map(str::trim)
            .filter_map(|item| item.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect()
    }

    pub fn client_ip(&self) -> Option<IpAddr> {
        self.client.map(|addr| addr.ip())
    }

    /// The full body. The transport is drained on the first call only.
    pub async fn body(&mut self) -> Result<Bytes> {
        match &self.state {
            BodyState::BodyCached(bytes) => return Ok(bytes.clone()),
            BodyState::Failed(error) => return Err(error.clone()),
            BodyState::Unread => {}
        }

        match body::accumulate(&mut self.source, self.body_limit).await {
            Ok(bytes) => {
                self.state = BodyState::BodyCached(bytes.clone());
                Ok(bytes)
            }
            Err(error) => {
                self.state = BodyState::Failed(error.clone());
                Err(error)
            }
        }
    }

    /// The body decoded with `encoding`.
    pub async fn text(&mut self, encoding: &str) -> Result<String> {
        let bytes = self.body().await?;
        charset::decode(&bytes, encoding).ok_or(BoundaryError::InvalidEncoding {
            detail: "Invalid body encoding",
        })
    }

    /// The body parsed as JSON.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.body().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "Rejected JSON body");
            BoundaryError::InvalidJson
        })
    }

    /// The decoded form. A multipart type without a boundary fails before
    /// the body is touched; media types that carry no form decode to an
    /// empty form without reading.
    pub async fn form(&mut self) -> Result<&FormData> {
        let form = match self.form.take() {
            Some(form) => form,
            None => self.decode_form().await?,
        };
        Ok(self.form.insert(form))
    }

    async fn decode_form(&mut self) -> Result<FormData> {
        if let BodyState::Failed(error) = &self.state {
            return Err(error.clone());
        }
        let media = MediaType::parse(self.header("content-type"));
        let encoding = FormEncoding::negotiate(&media)?;
        if encoding.reads_body() {
            let bytes = self.body().await?;
            encoding.decode(&bytes)
        } else {
            encoding.decode(&Bytes::new())
        }
    }
}
