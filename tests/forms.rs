//! End-to-end form decoding through the Axum router.

use axum::body::Body;
use axum::http::StatusCode;
use bytes::Bytes;
use futures_util::stream;
use serde_json::{json, Value};

use formgate::config::BoundaryConfig;
use formgate::testing::{encode_multipart, encode_urlencoded, FilePart};

mod common;

#[tokio::test]
async fn urlencoded_round_trip() {
    let router = common::router(BoundaryConfig::default());
    let body = encode_urlencoded(&[("a", "1"), ("b", "x"), ("b", "y")]);

    let (response, bytes) = common::send(
        &router,
        common::post("/forms", "application/x-www-form-urlencoded", body),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let summary: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(summary["fields"]["a"], json!(["1"]));
    assert_eq!(summary["fields"]["b"], json!(["x", "y"]));
    assert_eq!(summary["files"], json!({}));
}

#[tokio::test]
async fn multipart_round_trip() {
    let router = common::router(BoundaryConfig::default());
    let (body, content_type) = encode_multipart(
        &[("title", "Profile")],
        &[FilePart::new("avatar", "me.txt", b"hello").with_content_type("text/plain")],
    );

    let (response, bytes) = common::send(&router, common::post("/forms", &content_type, body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let summary: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(summary["fields"]["title"], json!(["Profile"]));
    assert_eq!(
        summary["files"]["avatar"],
        json!([{"filename": "me.txt", "content_type": "text/plain", "size": 5}])
    );
}

#[tokio::test]
async fn streamed_body_is_reassembled() {
    let router = common::router(BoundaryConfig::default());
    let chunks: Vec<Result<Bytes, std::io::Error>> = ["na", "me=al", "ice&x="]
        .into_iter()
        .map(|piece| Ok(Bytes::from(piece)))
        .collect();

    let (response, bytes) = common::send(
        &router,
        common::post(
            "/forms",
            "application/x-www-form-urlencoded",
            Body::from_stream(stream::iter(chunks)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let summary: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(summary["fields"]["name"], json!(["alice"]));
    assert_eq!(summary["fields"]["x"], json!([""]));
}

#[tokio::test]
async fn body_over_limit_is_413() {
    let mut config = BoundaryConfig::default();
    config.limits.max_request_body_bytes = Some(8);
    let router = common::router(config);

    let (response, bytes) = common::send(
        &router,
        common::post("/forms", "application/x-www-form-urlencoded", "a=0123456789"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(&bytes[..], b"Payload Too Large");
}

#[tokio::test]
async fn broken_stream_is_client_disconnect() {
    let router = common::router(BoundaryConfig::default());
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"a=1")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
    ];

    let (response, bytes) = common::send(
        &router,
        common::post(
            "/forms",
            "application/x-www-form-urlencoded",
            Body::from_stream(stream::iter(chunks)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(&bytes[..], b"Client disconnected");
}

#[tokio::test]
async fn decode_failures_are_400() {
    let router = common::router(BoundaryConfig::default());

    let cases: Vec<(&str, Body, &[u8])> = vec![
        (
            "multipart/form-data",
            Body::from("--x\r\n\r\n--x--\r\n"),
            &b"Missing multipart boundary"[..],
        ),
        (
            "multipart/form-data; boundary=abc",
            Body::from("no delimiter here"),
            &b"Malformed multipart form data"[..],
        ),
        (
            "application/x-www-form-urlencoded",
            Body::from(vec![b'a', b'=', 0xff, 0xfe]),
            &b"Invalid form encoding"[..],
        ),
    ];

    for (content_type, body, message) in cases {
        let (response, bytes) = common::send(&router, common::post("/forms", content_type, body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{content_type}");
        assert_eq!(&bytes[..], message, "{content_type}");
    }
}

#[tokio::test]
async fn other_media_types_decode_to_empty_form() {
    let router = common::router(BoundaryConfig::default());

    let (response, bytes) =
        common::send(&router, common::post("/forms", "application/json", "{\"a\":1}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let summary: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(summary, json!({"fields": {}, "files": {}}));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let router = common::router(BoundaryConfig::default());

    let (response, _) = common::send(
        &router,
        common::post("/forms", "application/x-www-form-urlencoded", "a=1"),
    )
    .await;

    assert!(response.headers().contains_key("x-request-id"));
}
