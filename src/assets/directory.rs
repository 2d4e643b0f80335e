//! Static directory mounts.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::StaticMountConfig;

/// Invalid static mount configuration. Raised at construction, never at
/// request time.
#[derive(Debug, Error)]
pub enum StaticConfigError {
    #[error("Static directory does not exist: {0}")]
    Missing(PathBuf),

    #[error("Static directory is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Static url_path {reason}")]
    UrlPath { reason: &'static str },

    #[error("Static cache_max_age must be greater than or equal to 0.")]
    NegativeMaxAge,
}

/// A directory served under a URL prefix. Immutable after construction and
/// shared freely between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDirectory {
    root: PathBuf,
    url_path: String,
    cache_max_age: u64,
}

impl StaticDirectory {
    /// Canonicalize `directory` and check the mount settings.
    pub fn new(
        directory: impl AsRef<Path>,
        url_path: impl Into<String>,
        cache_max_age: i64,
    ) -> Result<Self, StaticConfigError> {
        let directory = expand_home(directory.as_ref());
        let root = std::fs::canonicalize(&directory)
            .map_err(|_| StaticConfigError::Missing(directory.clone()))?;
        if !root.is_dir() {
            return Err(StaticConfigError::NotADirectory(root));
        }

        let url_path = url_path.into();
        check_url_path(&url_path).map_err(|reason| StaticConfigError::UrlPath { reason })?;

        let cache_max_age =
            u64::try_from(cache_max_age).map_err(|_| StaticConfigError::NegativeMaxAge)?;

        tracing::debug!(url_path = %url_path, cache_max_age, "Static directory mounted");
        Ok(Self {
            root,
            url_path,
            cache_max_age,
        })
    }

    pub fn from_config(config: &StaticMountConfig) -> Result<Self, StaticConfigError> {
        Self::new(&config.directory, config.url_path.clone(), config.cache_max_age)
    }

    /// Canonical absolute root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL mount prefix.
    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    pub fn cache_max_age(&self) -> u64 {
        self.cache_max_age
    }

    /// `Cache-Control` value for responses from this mount.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }

    /// Strip the mount prefix from a full request path. `None` when the path
    /// is not under this mount.
    pub fn strip_prefix<'a>(&self, request_path: &'a str) -> Option<&'a str> {
        if self.url_path == "/" {
            return request_path.strip_prefix('/');
        }
        request_path
            .strip_prefix(self.url_path.as_str())?
            .strip_prefix('/')
    }
}

/// Check a URL mount prefix, returning the reason it is malformed.
pub fn check_url_path(url_path: &str) -> Result<(), &'static str> {
    if !url_path.starts_with('/') {
        return Err("must start with '/'.");
    }
    if url_path.ends_with('/') && url_path != "/" {
        return Err("must not end with '/'.");
    }
    Ok(())
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}
