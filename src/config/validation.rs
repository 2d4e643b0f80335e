//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0, max-age >= 0)
//! - Validate static mount prefixes and detect duplicates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BoundaryConfig → Result<(), Vec<ValidationError>>
//! - Directory existence is checked when mounts are built, not here

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::assets::directory::check_url_path;
use crate::config::schema::BoundaryConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("limits.max_request_body_bytes must be greater than 0")]
    ZeroBodyLimit,

    #[error("static mount '{url_path}': {reason}")]
    UrlPath { url_path: String, reason: &'static str },

    #[error("static mount '{0}': cache_max_age must be greater than or equal to 0")]
    NegativeMaxAge(String),

    #[error("static mount '{0}' is declared more than once")]
    DuplicateMount(String),
}

/// Check a configuration, collecting every error.
pub fn validate_config(config: &BoundaryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.limits.max_request_body_bytes == Some(0) {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut seen = HashSet::new();
    for mount in &config.static_mounts {
        if let Err(reason) = check_url_path(&mount.url_path) {
            errors.push(ValidationError::UrlPath {
                url_path: mount.url_path.clone(),
                reason,
            });
        }
        if mount.cache_max_age < 0 {
            errors.push(ValidationError::NegativeMaxAge(mount.url_path.clone()));
        }
        if !seen.insert(mount.url_path.as_str()) {
            errors.push(ValidationError::DuplicateMount(mount.url_path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
