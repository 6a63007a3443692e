//! Admin API exercised in-process.

use std::sync::Arc;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use domain_failover::admin::{setup_admin_router, AdminState};
use domain_failover::probe::{FixedProbe, ProbeOutcome};

mod common;

const KEY: &str = "test-key";

fn app(probe: Arc<FixedProbe>) -> Router {
    let registry = common::registry(
        &[
            common::domain("example.com", &["m1.example.com"]),
            common::domain("other.org", &[]),
        ],
        probe,
    );
    setup_admin_router(AdminState::new(registry, KEY))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", KEY));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_requires_bearer_token() {
    let app = app(Arc::new(FixedProbe::reachable()));

    let missing = Request::builder().uri("/admin/status").body(Body::empty()).unwrap();
    assert_eq!(app.clone().oneshot(missing).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .uri("/admin/status")
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.clone().oneshot(wrong).await.unwrap().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_key_never_authorizes() {
    let registry = common::registry(&[common::domain("example.com", &[])], Arc::new(FixedProbe::reachable()));
    let app = setup_admin_router(AdminState::new(registry, ""));

    for value in ["Bearer ", "Bearer"] {
        let request = Request::builder()
            .uri("/admin/status")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_status_and_listing() {
    let app = app(Arc::new(FixedProbe::reachable()));

    let (status, body) = call(&app, Method::GET, "/admin/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["domains"], 2);

    let (status, body) = call(&app, Method::GET, "/admin/domains", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["primary"], "example.com");
    assert_eq!(body[0]["aliases"][0]["alias"], "m1.example.com");
    assert_eq!(body[0]["aliases"][0]["state"], "online");
    assert_eq!(body[1]["primary"], "other.org");
}

#[tokio::test]
async fn test_unknown_primary_is_404() {
    let app = app(Arc::new(FixedProbe::reachable()));
    let (status, _) = call(&app, Method::GET, "/admin/domains/missing.net/resolve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_offline_report_switches_resolution() {
    let app = app(Arc::new(FixedProbe::reachable()));

    let (_, body) = call(&app, Method::GET, "/admin/domains/example.com/resolve", None).await;
    assert_eq!(body["domain"], "example.com");

    let (status, body) = call(
        &app,
        Method::POST,
        "/admin/domains/example.com/offline",
        Some(json!({ "name": "example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["primary_online"], false);
    assert_eq!(body["domain_in_use"], "m1.example.com");

    let (_, body) = call(&app, Method::GET, "/admin/domains/example.com/resolve", None).await;
    assert_eq!(body["domain"], "m1.example.com");
}

#[tokio::test]
async fn test_alias_update_and_sweep() {
    let probe = Arc::new(FixedProbe::reachable());
    probe.set("m2.example.com", ProbeOutcome::Unreachable);
    let app = app(probe);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/admin/domains/example.com/aliases",
        Some(json!({ "aliases": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], false);
    assert_eq!(body["status"]["aliases"].as_array().unwrap().len(), 1);

    let (_, body) = call(
        &app,
        Method::PUT,
        "/admin/domains/example.com/aliases",
        Some(json!({ "aliases": ["m1.example.com", "m2.example.com"] })),
    )
    .await;
    assert_eq!(body["updated"], true);
    assert_eq!(body["status"]["aliases"].as_array().unwrap().len(), 2);

    let (status, body) = call(&app, Method::POST, "/admin/sweep", None).await;
    assert_eq!(status, StatusCode::OK);
    let reports = body.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["primary"], "example.com");
    assert_eq!(reports[0]["unreachable"], json!(["m2.example.com"]));
    assert_eq!(reports[1]["reset"], true);
}
