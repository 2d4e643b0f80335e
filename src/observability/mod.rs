//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http::body, form, assets produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never paths or payloads in messages
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
