//! Integration Tests for Serve-Mode Endpoints
//!
//! Tests full request/response cycle for the endpoints that do not need a
//! reachable Xero backend (health and cache administration).

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use xero_cli::api::{create_router, AppState};
use xero_cli::cache::Cache;
use xero_cli::config::Config;
use xero_cli::service::XeroService;
use xero_cli::xero::XeroClient;

// == Helper Functions ==

fn create_test_app() -> Router {
    let config = Config {
        client_id: Some("test-client".to_string()),
        client_secret: Some("test-secret".to_string()),
        ..Config::default()
    };
    let client = XeroClient::from_config(&config).unwrap();
    let cache = Cache::new("xero", Duration::from_secs(300));
    create_router(AppState::new(XeroService::new(client, cache)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Cache Stats Endpoint Tests ==

#[tokio::test]
async fn test_cache_stats_endpoint_shape() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cache/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 0);
    assert_eq!(json["misses"], 0);
    assert_eq!(json["entry_count"], 0);
    assert_eq!(json["hit_rate"], 0.0);
}

// == Cache Clear Endpoint Tests ==

#[tokio::test]
async fn test_cache_clear_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 0);
}

// == Cache Invalidate Endpoint Tests ==

#[tokio::test]
async fn test_cache_invalidate_unknown_key_is_not_an_error() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache/contacts:list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "contacts:list");
    assert_eq!(json["removed"], false);
}

// == Report Endpoint Tests ==

#[tokio::test]
async fn test_unknown_report_is_bad_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reports/cashflow")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("cashflow"));
}
