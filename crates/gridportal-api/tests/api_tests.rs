//! Integration tests for the portal API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::FutureExt;
use futures::future::BoxFuture;
use gridportal_api::router::build_router;
use gridportal_api::state::AppState;
use gridportal_core::notifications::NotificationQueue;
use gridportal_core::session::AggregationSession;
use gridportal_core::simulator::RequestSimulator;
use gridportal_core::source::{DataSource, FallbackSource, SourceError};
use gridportal_types::{
    CustomerProfile, NewsArticle, OutageRecord, SystemStatus, TariffEntry,
};
use serde_json::Value;
use tower::ServiceExt;

/// A backend that refuses every request.
struct DownSource;

fn down(endpoint: &str) -> SourceError {
    SourceError::Unavailable {
        endpoint: endpoint.to_owned(),
        message: String::from("connection refused"),
    }
}

impl DataSource for DownSource {
    fn outages(&self) -> BoxFuture<'_, Result<Vec<OutageRecord>, SourceError>> {
        async { Err(down("/outages")) }.boxed()
    }

    fn news(&self) -> BoxFuture<'_, Result<Vec<NewsArticle>, SourceError>> {
        async { Err(down("/news")) }.boxed()
    }

    fn tariffs(&self) -> BoxFuture<'_, Result<Vec<TariffEntry>, SourceError>> {
        async { Err(down("/tariffs")) }.boxed()
    }

    fn system_status(&self) -> BoxFuture<'_, Result<SystemStatus, SourceError>> {
        async { Err(down("/status")) }.boxed()
    }

    fn customer(&self, account_number: &str) -> BoxFuture<'_, Result<CustomerProfile, SourceError>> {
        let endpoint = format!("/customer/{account_number}");
        async move { Err(down(&endpoint)) }.boxed()
    }
}

async fn make_test_state() -> Arc<AppState> {
    let source: Arc<dyn DataSource> = Arc::new(FallbackSource::new(RequestSimulator::new(
        Duration::from_millis(1),
    )));
    let session = Arc::new(AggregationSession::new(Arc::clone(&source)));
    let _ = session.refresh().await;
    Arc::new(AppState::new(session, NotificationQueue::default(), source))
}

fn make_down_state() -> Arc<AppState> {
    let source: Arc<dyn DataSource> = Arc::new(DownSource);
    let session = Arc::new(AggregationSession::new(Arc::clone(&source)));
    Arc::new(AppState::new(session, NotificationQueue::default(), source))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_json(state: Arc<AppState>, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn delete(state: Arc<AppState>, uri: &str) -> StatusCode {
    build_router(state)
        .oneshot(Request::delete(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

async fn notification_titles(state: &Arc<AppState>) -> Vec<String> {
    state
        .notifications
        .list()
        .await
        .into_iter()
        .map(|n| n.title)
        .collect()
}

// =========================================================================
// Status page and session
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_get_session() {
    let (status, json) = get(make_test_state().await, "/api/session").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["loading"], false);
    assert_eq!(json["system_status"], "online");
    assert_eq!(json["outages"].as_array().unwrap().len(), 3);
    assert_eq!(json["news"].as_array().unwrap().len(), 3);
    assert_eq!(json["tariffs"].as_array().unwrap().len(), 4);
    assert!(json["error"].is_null());
}

#[tokio::test]
async fn test_manual_refresh_commits() {
    let (status, json) = post_json(
        make_test_state().await,
        "/api/session/refresh",
        &Value::Null,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "committed");
    assert!(json["last_updated"].is_string());
}

#[tokio::test]
async fn test_failed_refresh_is_reported_in_state() {
    let state = make_down_state();

    let (status, json) = post_json(Arc::clone(&state), "/api/session/refresh", &Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "failed");
    assert_eq!(json["message"], "/outages unavailable: connection refused");

    let (_, json) = get(state, "/api/status").await;
    assert_eq!(json["loading"], false);
    assert_eq!(json["error"], "/outages unavailable: connection refused");
    assert_eq!(json["active_outages"], 0);
}

#[tokio::test]
async fn test_status_summary() {
    let (status, json) = get(make_test_state().await, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["system_status"], "online");
    assert_eq!(json["active_outages"], 1);
    assert_eq!(json["loading"], false);
}

// =========================================================================
// Catalog
// =========================================================================

#[tokio::test]
async fn test_list_outages_filter_status() {
    let (status, json) = get(make_test_state().await, "/api/outages?status=ongoing").await;

    assert_eq!(status, StatusCode::OK);
    let outages = json.as_array().unwrap();
    assert_eq!(outages.len(), 1);
    assert_eq!(json[0]["area"], "Kitwe Residential");
}

#[tokio::test]
async fn test_list_outages_search() {
    let (status, json) = get(make_test_state().await, "/api/outages?search=LUSAKA&status=all").await;

    assert_eq!(status, StatusCode::OK);
    let outages = json.as_array().unwrap();
    assert_eq!(outages.len(), 1);
    assert_eq!(json[0]["district"], "Lusaka");
}

#[tokio::test]
async fn test_list_outages_unknown_status() {
    let (status, json) = get(make_test_state().await, "/api/outages?status=flooded").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert_eq!(json["error"], "unknown status: flooded");
}

#[tokio::test]
async fn test_list_news_by_category() {
    let (status, json) = get(make_test_state().await, "/api/news?category=renewable").await;

    assert_eq!(status, StatusCode::OK);
    let news = json.as_array().unwrap();
    assert_eq!(news.len(), 1);
    assert_eq!(json[0]["title"], "Solar Power Integration Project Launched");
}

#[tokio::test]
async fn test_list_tariffs_by_category() {
    let (status, json) = get(make_test_state().await, "/api/tariffs?category=residential").await;

    assert_eq!(status, StatusCode::OK);
    let tariffs = json.as_array().unwrap();
    assert_eq!(tariffs.len(), 2);
    assert!(tariffs.iter().all(|t| t["category"] == "Residential"));
}

#[tokio::test]
async fn test_estimate_residential_bill() {
    let (status, json) = get(
        make_test_state().await,
        "/api/tariffs/estimate?category=residential&usage=1000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], "1132.00");
    assert_eq!(json["currency"], "ZMW");
    assert_eq!(json["lines"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_estimate_defaults_to_residential() {
    let (status, json) = get(make_test_state().await, "/api/tariffs/estimate?usage=100").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "Residential");
    assert_eq!(json["total"], "89.00");
}

#[tokio::test]
async fn test_estimate_rejects_bad_usage() {
    let state = make_test_state().await;

    let (status, _) = get(Arc::clone(&state), "/api/tariffs/estimate").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = get(state, "/api/tariffs/estimate?usage=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_get_customer() {
    let (status, json) = get(make_test_state().await, "/api/customer/ACC-1001").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["account_number"], "ACC-1001");
    assert_eq!(json["name"], "John Doe");
    assert_eq!(json["status"], "active");
}

#[tokio::test]
async fn test_get_customer_source_down() {
    let (status, json) = get(make_down_state(), "/api/customer/ACC-1001").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], 502);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, json) = get(make_test_state().await, "/api/meters").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

// =========================================================================
// Notifications
// =========================================================================

#[tokio::test]
async fn test_notification_add_list_dismiss() {
    let state = make_test_state().await;

    let (status, json) = post_json(
        Arc::clone(&state),
        "/api/notifications",
        &serde_json::json!({ "kind": "info", "title": "Maintenance tonight" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["id"].as_str().unwrap().to_owned();

    let (status, json) = get(Arc::clone(&state), "/api/notifications").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "Maintenance tonight");
    assert_eq!(json[0]["kind"], "info");

    let path = format!("/api/notifications/{id}");
    assert_eq!(delete(Arc::clone(&state), &path).await, StatusCode::NO_CONTENT);
    // Dismissing again is a no-op with the same response.
    assert_eq!(delete(Arc::clone(&state), &path).await, StatusCode::NO_CONTENT);

    let (_, json) = get(state, "/api/notifications").await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_blank_title_rejected() {
    let (status, _) = post_json(
        make_test_state().await,
        "/api/notifications",
        &serde_json::json!({ "kind": "warning", "title": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dismiss_invalid_uuid() {
    let status = delete(make_test_state().await, "/api/notifications/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Portal flows
// =========================================================================

#[tokio::test]
async fn test_login_success_posts_notification() {
    let state = make_test_state().await;

    let (status, json) = post_json(
        Arc::clone(&state),
        "/api/portal/login",
        &serde_json::json!({ "account_number": "1001" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["account_number"], "1001");
    assert_eq!(json["current_balance"], "250.50");
    assert_eq!(notification_titles(&state).await, vec!["Login Successful"]);
}

#[tokio::test]
async fn test_login_without_account_number() {
    let state = make_test_state().await;

    let (status, _) = post_json(
        Arc::clone(&state),
        "/api/portal/login",
        &serde_json::json!({ "account_number": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(notification_titles(&state).await, vec!["Error"]);
}

#[tokio::test]
async fn test_login_source_down() {
    let state = make_down_state();

    let (status, _) = post_json(
        Arc::clone(&state),
        "/api/portal/login",
        &serde_json::json!({ "account_number": "1001" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(notification_titles(&state).await, vec!["Login Failed"]);
}

#[tokio::test]
async fn test_payment_success() {
    let state = make_test_state().await;

    let (status, json) = post_json(
        Arc::clone(&state),
        "/api/portal/payments",
        &serde_json::json!({ "account_number": "1001", "amount": "120.00" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["amount"], "120.00");
    assert!(json["reference"].is_string());

    let notes = state.notifications.list().await;
    assert_eq!(notes.len(), 1);
    assert_eq!(
        notes.first().unwrap().message.as_deref(),
        Some("Payment of K120.00 has been processed successfully")
    );
}

#[tokio::test]
async fn test_payment_invalid_amount() {
    let state = make_test_state().await;

    let (status, _) = post_json(
        Arc::clone(&state),
        "/api/portal/payments",
        &serde_json::json!({ "account_number": "1001", "amount": "0" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(notification_titles(&state).await, vec!["Invalid Amount"]);
}

#[tokio::test]
async fn test_payment_requires_account() {
    let (status, json) = post_json(
        make_test_state().await,
        "/api/portal/payments",
        &serde_json::json!({ "amount": "50" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["status"], 401);
}

#[tokio::test]
async fn test_contact_form() {
    let state = make_test_state().await;

    let (status, json) = post_json(
        Arc::clone(&state),
        "/api/contact",
        &serde_json::json!({ "name": "Mwila", "subject": "Meter reading" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "missing required fields: email, message");

    let (status, json) = post_json(
        Arc::clone(&state),
        "/api/contact",
        &serde_json::json!({
            "name": "Mwila",
            "email": "mwila@example.com",
            "subject": "Meter reading",
            "message": "My meter shows no reading since Monday."
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "sent");
    assert_eq!(
        notification_titles(&state).await,
        vec!["Missing Information", "Message Sent"]
    );
}
