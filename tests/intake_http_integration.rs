//! Integration tests for the intake HTTP surface.
//!
//! These tests exercise the full router with in-memory adapters:
//! 1. Health check
//! 2. Event posting and reply serialization
//! 3. Identity validation

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use listing_intake::adapters::generation::TemplateListingGenerator;
use listing_intake::adapters::http::{app_router, IntakeHandlers, ReportHandlers};
use listing_intake::adapters::records::InMemoryRecordSink;
use listing_intake::adapters::session::InMemorySessionStore;
use listing_intake::adapters::vision::MockVisionAnalyzer;
use listing_intake::application::{GenerateReportHandler, HandleInboundEventHandler};
use listing_intake::domain::report::ReportGenerator;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn router() -> Router {
    let records = Arc::new(InMemoryRecordSink::default());
    let handler = HandleInboundEventHandler::new(
        Arc::new(InMemorySessionStore::new(chrono::Duration::minutes(30))),
        Arc::new(MockVisionAnalyzer::new()),
        Arc::new(TemplateListingGenerator::default()),
        records.clone(),
    );
    let utc = chrono::FixedOffset::east_opt(0).unwrap();
    let reports = GenerateReportHandler::new(records, ReportGenerator::new(utc));
    app_router(
        IntakeHandlers::new(Arc::new(handler)),
        ReportHandlers::new(Arc::new(reports)),
        Duration::from_secs(10),
    )
}

async fn post_event(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/intake/events")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let app = router();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn image_event_returns_null_reply() {
    let app = router();

    let (status, body) = post_event(
        &app,
        json!({"identity": "U1", "kind": "image", "payload": "img-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": null}));
}

#[tokio::test]
async fn price_line_after_image_returns_measurement_prompt() {
    let app = router();
    post_event(
        &app,
        json!({"identity": "U1", "kind": "image", "payload": "img-1"}),
    )
    .await;

    let (status, body) = post_event(
        &app,
        json!({"identity": "U1", "kind": "text", "payload": "880 222"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("着丈 身幅 肩幅 袖丈"));
}

#[tokio::test]
async fn text_before_images_returns_welcome() {
    let app = router();

    let (status, body) = post_event(
        &app,
        json!({"identity": "U2", "kind": "text", "payload": "こんにちは"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().contains("商品画像"));
}

#[tokio::test]
async fn blank_identity_is_rejected() {
    let app = router();

    let (status, body) = post_event(
        &app,
        json!({"identity": "  ", "kind": "text", "payload": "880 222"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn empty_image_payload_is_rejected() {
    let app = router();

    let (status, _) = post_event(&app, json!({"identity": "U1", "kind": "image"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
