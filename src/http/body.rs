//! Request body accumulation.
//!
//! # Responsibilities
//! - Drain a chunked message source into one contiguous buffer
//! - Enforce the optional body size ceiling while draining
//! - Surface disconnects instead of returning a partial buffer
//!
//! # Design Decisions
//! - The only await point of the boundary layer lives here
//! - The ceiling is checked on every fragment, so oversized bodies stop
//!   being read as soon as the limit is crossed
//! - Memoization is owned by `Request`, not by this function

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

use crate::error::{BoundaryError, Result};
use crate::http::transport::BodyMessage;
use crate::observability::metrics;

/// Read every fragment from `source` until the final one arrives.
pub async fn accumulate<S>(source: &mut S, limit: Option<usize>) -> Result<Bytes>
where
    S: Stream<Item = BodyMessage> + Unpin + ?Sized,
{
    let mut buffer = BytesMut::new();
    let mut seen: usize = 0;

    loop {
        let message = match source.next().await {
            Some(message) => message,
            None => {
                tracing::warn!(received = seen, "Transport closed before final body fragment");
                metrics::record_body_rejected("disconnect");
                return Err(BoundaryError::ClientDisconnected);
            }
        };

        let (bytes, more_body) = match message {
            BodyMessage::Chunk { bytes, more_body } => (bytes, more_body),
            BodyMessage::Disconnect => {
                tracing::warn!(received = seen, "Client disconnected during body read");
                metrics::record_body_rejected("disconnect");
                return Err(BoundaryError::ClientDisconnected);
            }
            BodyMessage::Other(kind) => {
                tracing::trace!(kind = %kind, "Ignoring unrecognized transport message");
                continue;
            }
        };

        seen = seen.saturating_add(bytes.len());
        if let Some(limit) = limit {
            if seen > limit {
                tracing::warn!(received = seen, limit, "Request body exceeds limit");
                metrics::record_body_rejected("too_large");
                return Err(BoundaryError::PayloadTooLarge);
            }
        }
        buffer.extend_from_slice(&bytes);

        if !more_body {
            break;
        }
    }

    tracing::debug!(bytes = buffer.len(), "Request body received");
    metrics::record_body_bytes(buffer.len());
    Ok(buffer.freeze())
}
