//! Integration tests for the open endpoints, the access gate and general
//! HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with, get, get_ungated, test_config};

// ---------------------------------------------------------------------------
// Test: open endpoints need no gate header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_is_open() {
    let (app, _) = build_test_app();
    let response = get_ungated(app, "/ping").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn welcome_is_open() {
    let (app, _) = build_test_app();
    let response = get_ungated(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].is_string());
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: gated endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gated_route_without_header_is_forbidden() {
    let (app, _) = build_test_app();
    let response = get_ungated(app, "/create-custom-qr?data=hi").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert!(json["error"].as_str().unwrap().contains("x-rapidapi-host"));
}

#[tokio::test]
async fn gated_route_with_header_is_served() {
    let (app, _) = build_test_app();
    let response = get(app, "/create-custom-qr?data=hi&size=100").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn disabled_gate_lets_everything_through() {
    let config = qrstyle::server::ServerConfig {
        gate_header: String::new(),
        ..test_config()
    };
    let (app, _) = build_test_app_with(config);
    let response = get_ungated(app, "/create-custom-qr?data=hi&size=100").await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: general behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _) = build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (app, _) = build_test_app();
    let response = get(app, "/ping").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}
