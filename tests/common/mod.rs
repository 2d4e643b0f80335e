//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use tempfile::TempDir;
use tower::ServiceExt;

use formgate::config::{BoundaryConfig, StaticMountConfig};
use formgate::config::loader::build_static_mounts;
use formgate::HttpServer;

/// A temporary static root populated with `files` (relative paths, nested
/// directories created as needed).
pub fn static_root(files: &[(&str, &[u8])]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    dir
}

/// Default config with one mount of `root` at `url_path`.
pub fn config_with_mount(root: &Path, url_path: &str, cache_max_age: i64) -> BoundaryConfig {
    let mut config = BoundaryConfig::default();
    config.static_mounts.push(StaticMountConfig {
        directory: root.to_string_lossy().into_owned(),
        url_path: url_path.to_string(),
        cache_max_age,
    });
    config
}

/// Build the full router for `config`.
pub fn router(config: BoundaryConfig) -> Router {
    let mounts = build_static_mounts(&config).unwrap();
    HttpServer::new(config, mounts).into_router()
}

/// Drive one request through the router and collect the body.
pub async fn send(router: &Router, request: Request<Body>) -> (Response<()>, Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (Response::from_parts(parts, ()), bytes)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str, content_type: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(body.into())
        .unwrap()
}
