//! Error pipeline behavior through the full production service: the 404
//! fallback, panic masking, layer-level classification, and the uniform
//! response shape.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use axum::{Router, body::Body};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use storefront_api::app::build_app;
use storefront_api::middleware::http;

use common::{MemoryLookup, customer, test_config, test_state};

fn full_app() -> http::AppService {
    let state = test_state(
        Arc::new(MemoryLookup::new(vec![customer()])),
        Duration::from_secs(1),
    );
    build_app(state, &test_config())
}

fn get_request(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_passes_through_the_full_stack() {
    let res = full_app()
        .oneshot(get_request("/api/v1/health"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_the_baseline_security_headers() {
    let res = full_app()
        .oneshot(get_request("/api/v1/health"))
        .await
        .unwrap();

    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "DENY");
    assert_eq!(res.headers()["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn unknown_api_path_gets_the_classified_404_with_the_path_in_the_message() {
    let res = full_app()
        .oneshot(get_request("/api/v1/nonexistent"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(
        body["error"]["message"],
        "Can't find /api/v1/nonexistent on this server"
    );
}

#[tokio::test]
async fn unknown_root_path_falls_through_static_files_to_the_same_404() {
    let res = full_app()
        .oneshot(get_request("/definitely/not/here"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(
        body["error"]["message"],
        "Can't find /definitely/not/here on this server"
    );
}

#[tokio::test]
async fn error_bodies_share_one_shape() {
    let res = full_app()
        .oneshot(get_request("/api/v1/users/me"))
        .await
        .unwrap();

    // Protected route without a cookie: operational 401 with code + message.
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(res).await;
    assert!(body["error"]["code"].is_string());
    assert!(!body["error"]["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn a_panicking_handler_is_masked_as_a_generic_500() {
    async fn boom() -> &'static str {
        panic!("secret detail that must not leak");
    }

    let svc = http::apply(Router::new().route("/boom", get(boom)), &test_config());

    let res = svc.oneshot(get_request("/boom")).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(body["error"]["message"], "internal server error");
    assert!(
        !body.to_string().contains("secret detail"),
        "panic payload must never reach the client"
    );
}

#[tokio::test]
async fn requests_beyond_the_rate_limit_are_classified_as_429() {
    let mut config = test_config();
    config.rate_limit_max = 2;
    config.rate_limit_window = Duration::from_secs(3600);

    let svc = http::apply(
        Router::new().route("/ping", get(|| async { "pong" })),
        &config,
    );

    // Clones share the limiter; the first `rate_limit_max` requests pass.
    for _ in 0..2 {
        let res = svc.clone().oneshot(get_request("/ping")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    // Everything past the limit sheds with the classified 429, repeatedly.
    for _ in 0..2 {
        let res = svc.clone().oneshot(get_request("/ping")).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(res).await;
        assert_eq!(body["error"]["code"], "TOO_MANY_REQUESTS");
    }
}

#[tokio::test]
async fn a_stalled_handler_is_cut_off_with_the_classified_408() {
    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(60)).await;
        "done"
    }

    let mut config = test_config();
    config.request_timeout = Duration::from_millis(50);

    let svc = http::apply(Router::new().route("/slow", get(slow)), &config);

    let res = svc.oneshot(get_request("/slow")).await.unwrap();
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    let body = body_json(res).await;
    assert_eq!(body["error"]["code"], "REQUEST_TIMEOUT");
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let app = full_app();
    let large = vec![b'a'; 64 * 1024];
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(large))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
