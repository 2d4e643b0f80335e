//! Static path resolution.
//!
//! # Responsibilities
//! - Reject unsafe client paths using string rules only
//! - Resolve the remainder against the mount root, following symlinks
//! - Confine the resolved path to the root
//!
//! # Design Decisions
//! - Two separate stages: `normalize_static_path` never touches the
//!   filesystem, `resolve_static_path` never re-checks string rules
//! - Every rejection is `NotFound`, whatever the reason
//! - Backslashes count as separators so Windows-style escapes are caught

use std::path::PathBuf;

use crate::assets::directory::StaticDirectory;
use crate::error::{BoundaryError, Result};

/// A client path that passed the string rules: non-empty relative segments,
/// none hidden, none `.`/`..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath {
    segments: Vec<String>,
}

impl SafePath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Apply the string-only safety rules to a client path.
pub fn normalize_static_path(value: &str) -> Result<SafePath> {
    if value.is_empty() || value.contains(&['\0', '\r', '\n'][..]) {
        return Err(BoundaryError::NotFound);
    }

    let normalized = value.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(BoundaryError::NotFound);
    }

    let segments: Vec<&str> = normalized.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == ".." || s.starts_with('.'))
    {
        return Err(BoundaryError::NotFound);
    }
    if segments.first().is_some_and(|first| first.ends_with(':')) {
        return Err(BoundaryError::NotFound);
    }

    Ok(SafePath {
        segments: segments.into_iter().map(str::to_owned).collect(),
    })
}

/// Resolve a safe path under `directory` to an existing regular file inside
/// the root.
pub fn resolve_static_path(directory: &StaticDirectory, path: &SafePath) -> Result<PathBuf> {
    let candidate = path
        .segments()
        .iter()
        .fold(directory.root().to_path_buf(), |acc, segment| acc.join(segment));

    let resolved = std::fs::canonicalize(&candidate).map_err(|_| BoundaryError::NotFound)?;
    if !resolved.starts_with(directory.root()) {
        tracing::debug!("Static path resolved outside its root");
        return Err(BoundaryError::NotFound);
    }

    let metadata = std::fs::metadata(&resolved).map_err(|_| BoundaryError::NotFound)?;
    if !metadata.is_file() {
        return Err(BoundaryError::NotFound);
    }
    Ok(resolved)
}

/// Both stages in order.
pub fn resolve(directory: &StaticDirectory, value: &str) -> Result<PathBuf> {
    let path = normalize_static_path(value)?;
    resolve_static_path(directory, &path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_relative_paths() {
        let path = normalize_static_path("css/site.css").unwrap();
        assert_eq!(path.segments(), ["css", "site.css"]);

        let path = normalize_static_path("img\\logo.png").unwrap();
        assert_eq!(path.segments(), ["img", "logo.png"]);
    }

    #[test]
    fn rejects_unsafe_strings() {
        for value in [
            "",
            "../outside.txt",
            "/etc/passwd",
            ".env",
            "a/../../b",
            "C:/x",
            "C:\\x",
            "..\\secret",
            "a/./b",
            "a//b",
            "dir/",
            "dir/.git/config",
            "a\0b",
            "a\r\nb",
            "\\\\server\\share",
        ] {
            assert_eq!(
                normalize_static_path(value),
                Err(BoundaryError::NotFound),
                "{value:?}"
            );
        }
    }

    #[test]
    fn colon_only_matters_in_first_segment() {
        assert!(normalize_static_path("a/b:c").is_ok());
        assert!(normalize_static_path("a:").is_err());
    }

    #[test]
    fn resolves_files_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.css"), "body{}").unwrap();
        let mount = StaticDirectory::new(dir.path(), "/static", 0).unwrap();

        let resolved = resolve(&mount, "css/site.css").unwrap();
        assert_eq!(resolved, mount.root().join("css").join("site.css"));
    }

    #[test]
    fn missing_files_and_directories_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        let mount = StaticDirectory::new(dir.path(), "/static", 0).unwrap();

        assert_eq!(resolve(&mount, "missing.txt"), Err(BoundaryError::NotFound));
        assert_eq!(resolve(&mount, "css"), Err(BoundaryError::NotFound));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("static");
        std::fs::create_dir(&root).unwrap();
        let outside = dir.path().join("outside.txt");
        std::fs::write(&outside, "outside").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("escape.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("nowhere"), root.join("broken.txt")).unwrap();
        let mount = StaticDirectory::new(&root, "/static", 0).unwrap();

        assert_eq!(resolve(&mount, "escape.txt"), Err(BoundaryError::NotFound));
        assert_eq!(resolve(&mount, "broken.txt"), Err(BoundaryError::NotFound));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_is_followed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("alias.txt")).unwrap();
        let mount = StaticDirectory::new(dir.path(), "/static", 0).unwrap();

        let resolved = resolve(&mount, "alias.txt").unwrap();
        assert_eq!(resolved, mount.root().join("real.txt"));
    }
}
