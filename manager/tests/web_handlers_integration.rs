//! Integration tests for the web API handlers
//!
//! Each test drives the real router with an in-memory database through
//! `tower::ServiceExt::oneshot` and asserts on the response envelope.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use maintenance_manager::config::Config;
use maintenance_manager::database::Database;
use maintenance_manager::services::MaintenanceService;
use maintenance_manager::web::{create_router, AppState};

async fn test_app_with_token(api_token: Option<&str>) -> Router {
    let database = Arc::new(Database::in_memory().await.unwrap());
    let service = Arc::new(MaintenanceService::new(database));
    let config = Arc::new(Config {
        api_token: api_token.map(str::to_string),
        ..Config::default()
    });
    create_router(AppState::new(config, service))
}

async fn test_app() -> Router {
    test_app_with_token(None).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_with_auth(app, method, uri, body, None).await
}

async fn send_with_auth(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn future_window_body(title: &str, start_minutes: i64, end_minutes: i64) -> Value {
    let now = Utc::now();
    json!({
        "title": title,
        "startTime": (now + Duration::minutes(start_minutes)).to_rfc3339(),
        "endTime": (now + Duration::minutes(end_minutes)).to_rfc3339(),
        "type": "database"
    })
}

#[tokio::test]
async fn test_create_and_fetch_window() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Database upgrade", 10, 70)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let data = &body["data"];
    assert_eq!(data["status"], json!("scheduled"));
    assert_eq!(data["type"], json!("database"));
    assert_eq!(data["isActive"], json!(false));
    assert!(data["startTime"].is_string());

    let id = data["id"].as_str().unwrap();
    let (status, body) = send(&app, "GET", &format!("/api/maintenance/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(id));
}

#[tokio::test]
async fn test_create_with_inverted_times_is_a_bad_request() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Broken", 70, 10)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("endTime"));
}

#[tokio::test]
async fn test_overlapping_create_is_a_conflict() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("First", 10, 70)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Second", 30, 90)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_current_status_reflects_the_active_window() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/maintenance/current-status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isUnderMaintenance"], json!(false));
    assert!(body["data"]["maintenance"].is_null());

    // A window starting in the past is active from the moment it is created.
    let (status, created) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Hotfix", -5, 55)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["data"]["status"], json!("in_progress"));

    let (_, body) = send(&app, "GET", "/api/maintenance/current-status", None).await;
    assert_eq!(body["data"]["isUnderMaintenance"], json!(true));
    assert_eq!(body["data"]["maintenance"]["id"], created["data"]["id"]);
}

#[tokio::test]
async fn test_unknown_window_is_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/maintenance/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_patch_edits_scheduled_and_rejects_in_progress() {
    let app = test_app().await;

    let (_, scheduled) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Scheduled", 10, 70)),
    )
    .await;
    let scheduled_id = scheduled["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/maintenance/{}", scheduled_id),
        Some(json!({ "title": "Scheduled v2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], json!("Scheduled v2"));

    let (_, active) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Active", -1, 5)),
    )
    .await;
    let active_id = active["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/maintenance/{}", active_id),
        Some(json!({ "title": "too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_start_stop_and_cancel_endpoints() {
    let app = test_app().await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Lifecycle", 10, 70)),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", &format!("/api/maintenance/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("in_progress"));
    assert_eq!(body["data"]["isActive"], json!(true));

    let (status, body) = send(&app, "POST", &format!("/api/maintenance/{}/stop", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("completed"));
    assert!(body["data"]["duration"].is_i64());

    // Terminal now, so a second stop is rejected.
    let (status, _) = send(&app, "POST", &format!("/api/maintenance/{}/stop", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, other) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("To cancel", 100, 160)),
    )
    .await;
    let other_id = other["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/maintenance/{}/cancel", other_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("cancelled"));
}

#[tokio::test]
async fn test_delete_refuses_in_progress_windows() {
    let app = test_app().await;

    let (_, active) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Active", -1, 60)),
    )
    .await;
    let id = active["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/api/maintenance/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", &format!("/api/maintenance/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bulk_delete_removes_all_named_windows() {
    let app = test_app().await;

    let (_, a) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("A", 10, 40)),
    )
    .await;
    let (_, b) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("B", 50, 80)),
    )
    .await;
    let ids = json!({
        "ids": [a["data"]["id"], b["data"]["id"]]
    });

    let (status, body) = send(&app, "DELETE", "/api/maintenance", Some(ids)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], json!(2));

    let (_, listing) = send(&app, "GET", "/api/maintenance", None).await;
    assert_eq!(listing["data"]["total"], json!(0));
}

#[tokio::test]
async fn test_listing_supports_filters_and_pagination() {
    let app = test_app().await;

    send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Scheduled window", 100, 140)),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Active window", -1, 90)),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/maintenance?status=scheduled&page=1&limit=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["page"], json!(1));
    assert_eq!(body["data"]["limit"], json!(10));
    assert_eq!(body["data"]["items"][0]["status"], json!("scheduled"));

    // Set filters accept a comma-separated list.
    let (status, body) = send(
        &app,
        "GET",
        "/api/maintenance?status=scheduled,in_progress",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(2));

    let (status, _) = send(&app, "GET", "/api/maintenance?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/maintenance?title=active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
}

#[tokio::test]
async fn test_upcoming_lists_windows_inside_the_horizon() {
    let app = test_app().await;

    send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Tomorrow", 24 * 60, 24 * 60 + 30)),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_window_body("Next week", 7 * 24 * 60, 7 * 24 * 60 + 30)),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/maintenance/upcoming", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], json!("Tomorrow"));
}

#[tokio::test]
async fn test_bearer_token_is_enforced_when_configured() {
    let app = test_app_with_token(Some("secret")).await;

    let (status, _) = send(&app, "GET", "/api/maintenance/current-status", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_with_auth(
        &app,
        "GET",
        "/api/maintenance/current-status",
        None,
        Some("wrong"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_with_auth(
        &app,
        "GET",
        "/api/maintenance/current-status",
        None,
        Some("secret"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}
