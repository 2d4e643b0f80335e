//! End-to-end static serving through the Axum router.

use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{Request, StatusCode};

mod common;

#[tokio::test]
async fn serves_file_with_cache_headers() {
    let root = common::static_root(&[("css/site.css", b"body{color:black;}")]);
    let router = common::router(common::config_with_mount(root.path(), "/static", 86400));

    let (response, bytes) = common::send(&router, common::get("/static/css/site.css")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["content-type"], "text/css");
    assert_eq!(headers["cache-control"], "public, max-age=86400");
    assert_eq!(headers["content-length"], "18");
    assert!(headers.contains_key("etag"));
    assert!(headers.contains_key("last-modified"));
    assert_eq!(&bytes[..], b"body{color:black;}");
}

#[tokio::test]
async fn conditional_get_is_idempotent() {
    let root = common::static_root(&[("app.js", b"console.log('ok')")]);
    let router = common::router(common::config_with_mount(root.path(), "/static", 60));

    let (first, _) = common::send(&router, common::get("/static/app.js")).await;
    let etag = first.headers()["etag"].to_str().unwrap().to_string();

    for _ in 0..2 {
        let request = Request::builder()
            .uri("/static/app.js")
            .header("if-none-match", &etag)
            .body(Body::empty())
            .unwrap();
        let (response, bytes) = common::send(&router, request).await;

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(bytes.is_empty());
        assert_eq!(response.headers()["etag"], etag.as_str());
        assert_eq!(response.headers()["cache-control"], "public, max-age=60");
    }
}

#[tokio::test]
async fn modification_changes_validator() {
    let root = common::static_root(&[("app.js", b"v1")]);
    let router = common::router(common::config_with_mount(root.path(), "/static", 60));

    let (first, _) = common::send(&router, common::get("/static/app.js")).await;
    let etag = first.headers()["etag"].to_str().unwrap().to_string();

    let path = root.path().join("app.js");
    std::fs::write(&path, "version two").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(5))
        .unwrap();

    let request = Request::builder()
        .uri("/static/app.js")
        .header("if-none-match", &etag)
        .body(Body::empty())
        .unwrap();
    let (response, bytes) = common::send(&router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_ne!(response.headers()["etag"], etag.as_str());
    assert_eq!(&bytes[..], b"version two");
}

#[tokio::test]
async fn head_matches_get_headers() {
    let root = common::static_root(&[("site.css", b"body{}")]);
    let router = common::router(common::config_with_mount(root.path(), "/static", 60));

    let (get, get_body) = common::send(&router, common::get("/static/site.css")).await;
    let head_request = Request::builder()
        .method("HEAD")
        .uri("/static/site.css")
        .body(Body::empty())
        .unwrap();
    let (head, head_body) = common::send(&router, head_request).await;

    assert_eq!(head.status(), get.status());
    for name in ["content-type", "content-length", "cache-control", "etag", "last-modified"] {
        assert_eq!(head.headers()[name], get.headers()[name], "{name}");
    }
    assert_eq!(get_body.len(), 6);
    assert!(head_body.is_empty());
}

#[tokio::test]
async fn unsafe_paths_are_404() {
    let root = common::static_root(&[
        ("public/index.html", b"<h1>ok</h1>"),
        ("public/.env", b"SECRET=1"),
        ("outside.txt", b"outside"),
    ]);
    let public = root.path().join("public");
    #[cfg(unix)]
    std::os::unix::fs::symlink(root.path().join("outside.txt"), public.join("escape.txt")).unwrap();
    let router = common::router(common::config_with_mount(&public, "/static", 60));

    for uri in [
        "/static/../outside.txt",
        "/static/%2E%2E/outside.txt",
        "/static/.env",
        "/static/a/../../b",
        "/static/C:/x",
        "/static/%2Fetc%2Fpasswd",
        "/static/..%5Coutside.txt",
        "/static/escape.txt",
        "/static/missing.txt",
        "/static/%FF",
        "/static/a%FFb.txt",
        "/static/%C0%AE%C0%AE/x",
        "/nowhere",
    ] {
        let (response, bytes) = common::send(&router, common::get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(&bytes[..], b"Not Found", "{uri}");
    }

    let (response, _) = common::send(&router, common::get("/static/index.html")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn precompressed_assets_declare_encoding() {
    let root = common::static_root(&[("bundle.js.gz", b"\x1f\x8b fake")]);
    let router = common::router(common::config_with_mount(root.path(), "/assets", 0));

    let (response, _) = common::send(&router, common::get("/assets/bundle.js.gz")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/javascript");
    assert_eq!(response.headers()["content-encoding"], "gzip");
    assert_eq!(response.headers()["cache-control"], "public, max-age=0");
}
