//! Helpers for building request bodies in tests.

use bytes::{BufMut, Bytes, BytesMut};
use url::form_urlencoded;
use uuid::Uuid;

use crate::http::transport::{from_messages, BodyMessage, BoxedSource};

/// A file to include in a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content: &'a [u8],
    pub content_type: &'a str,
}

impl<'a> FilePart<'a> {
    pub fn new(field: &'a str, filename: &'a str, content: &'a [u8]) -> Self {
        Self {
            field,
            filename,
            content,
            content_type: "application/octet-stream",
        }
    }

    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = content_type;
        self
    }
}

/// Encode fields then files as `multipart/form-data` with a fresh boundary.
/// Returns the body and the matching `Content-Type` header value.
pub fn encode_multipart(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> (Bytes, String) {
    let boundary = format!("formgate-{}", Uuid::new_v4().simple());
    let mut body = BytesMut::new();

    for (name, value) in fields {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
        body.put_slice(value.as_bytes());
        body.put_slice(b"\r\n");
    }

    for file in files {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.put_slice(file.content);
        body.put_slice(b"\r\n");
    }

    body.put_slice(format!("--{boundary}--\r\n").as_bytes());
    (body.freeze(), format!("multipart/form-data; boundary={boundary}"))
}

/// Encode pairs as `application/x-www-form-urlencoded`.
pub fn encode_urlencoded(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// A source delivering `body` in fragments of at most `chunk_size` bytes.
/// An empty body is a single empty final fragment.
pub fn chunked_source(body: &[u8], chunk_size: usize) -> BoxedSource {
    let chunk_size = chunk_size.max(1);
    let mut messages: Vec<BodyMessage> = body
        .chunks(chunk_size)
        .map(|piece| BodyMessage::chunk(Bytes::copy_from_slice(piece)))
        .collect();

    match messages.last_mut() {
        Some(BodyMessage::Chunk { more_body, .. }) => *more_body = false,
        _ => messages.push(BodyMessage::last(Bytes::new())),
    }
    from_messages(messages)
}
