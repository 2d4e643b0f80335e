//! Transport message vocabulary.
//!
//! # Responsibilities
//! - Define the tagged messages a chunked transport delivers
//! - Adapt Axum request bodies into a message source
//!
//! # Data Flow
//! ```text
//! hyper/axum Body
//!     → into_data_stream()
//!     → BodyMessage::Chunk { more_body: true } per frame
//!     → trailing BodyMessage::Chunk { more_body: false }
//! ```

use std::pin::Pin;

use axum::body::Body;
use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};

/// A single message received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyMessage {
    /// A body fragment. `more_body` is false on the final fragment.
    Chunk { bytes: Bytes, more_body: bool },
    /// The client went away.
    Disconnect,
    /// A message kind this layer does not understand.
    Other(String),
}

impl BodyMessage {
    /// A fragment with more data to follow.
    pub fn chunk(bytes: impl Into<Bytes>) -> Self {
        Self::Chunk {
            bytes: bytes.into(),
            more_body: true,
        }
    }

    /// The final fragment.
    pub fn last(bytes: impl Into<Bytes>) -> Self {
        Self::Chunk {
            bytes: bytes.into(),
            more_body: false,
        }
    }
}

/// Boxed message source, as produced by the adapters in this module.
pub type BoxedSource = Pin<Box<dyn Stream<Item = BodyMessage> + Send>>;

/// Adapt an Axum body into a message source.
///
/// Every data frame becomes a non-final chunk, a body error becomes a
/// disconnect, and an empty final chunk closes the stream.
pub fn from_body(body: Body) -> BoxedSource {
    let frames = body.into_data_stream().map(|frame| match frame {
        Ok(bytes) => BodyMessage::chunk(bytes),
        Err(error) => {
            tracing::debug!(error = %error, "Request body stream failed");
            BodyMessage::Disconnect
        }
    });
    Box::pin(frames.chain(stream::iter([BodyMessage::last(Bytes::new())])))
}

/// A source that replays a fixed list of messages.
pub fn from_messages(messages: Vec<BodyMessage>) -> BoxedSource {
    Box::pin(stream::iter(messages))
}

/// A source delivering a complete body in one final fragment.
pub fn from_bytes(bytes: impl Into<Bytes>) -> BoxedSource {
    from_messages(vec![BodyMessage::last(bytes)])
}
