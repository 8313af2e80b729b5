//! End-to-end tests of the HTTP surface: routing, status codes, error bodies,
//! and the JSON shapes the dashboard consumes.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use database::DbRepository;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use web_server::{app, AppState};

/// Spins up the router over a fresh, migrated database in a temp directory.
async fn test_app() -> (TempDir, Router) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("sqlite://{}/test.db", dir.path().display());
    let pool = database::connect_with_url(&url)
        .await
        .expect("failed to open test database");
    database::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    let state = Arc::new(AppState {
        db_repo: DbRepository::new(pool),
    });
    (dir, app(state))
}

/// Fires one request and returns (status, parsed JSON body). Non-JSON bodies
/// come back as `Value::Null`.
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to collect body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_probe_answers() {
    let (_dir, app) = test_app().await;
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn customer_crud_round_trip() {
    let (_dir, app) = test_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "Alice Smith", "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["customer_id"], 1);
    assert_eq!(created["name"], "Alice Smith");

    let (status, fetched) = send(&app, "GET", "/customers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    // Partial update: only the name changes, the email stays put.
    let (status, updated) = send(
        &app,
        "PUT",
        "/customers/1",
        Some(json!({ "name": "Alice Jones" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alice Jones");
    assert_eq!(updated["email"], "alice@example.com");

    let (status, deleted) = send(&app, "DELETE", "/customers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Customer deleted successfully");

    let (status, body) = send(&app, "GET", "/customers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}

#[tokio::test]
async fn missing_required_field_is_unprocessable() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "No Email" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_field_is_unprocessable() {
    let (_dir, app) = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "A", "email": "a@b.c", "nickname": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let (_dir, app) = test_app().await;

    let payload = json!({ "name": "Alice", "email": "alice@example.com" });
    let (status, _) = send(&app, "POST", "/customers", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/customers", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_and_delete_of_missing_rows_are_not_found() {
    let (_dir, app) = test_app().await;

    let (status, _) = send(&app, "PUT", "/products/9", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/ab-tests/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_empty_not_an_error() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(&app, "GET", "/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // Out-of-range offsets are fine too.
    let (status, body) = send(&app, "GET", "/customers?skip=1000&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_pagination_slices_the_table() {
    let (_dir, app) = test_app().await;

    for i in 0..4 {
        let (status, _) = send(
            &app,
            "POST",
            "/customers",
            Some(json!({ "name": format!("Customer {i}"), "email": format!("c{i}@example.com") })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/customers?skip=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().expect("expected a JSON array");
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["customer_id"], 2);
    assert_eq!(page[1]["customer_id"], 3);
}

#[tokio::test]
async fn product_cascade_over_http() {
    let (_dir, app) = test_app().await;

    let (status, product) = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "Widget", "category": "Tools", "release_date": "2024-01-01"
        })),
    )
    .await;
    // `name` is not a product field; the boundary rejects it.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(product["error"].is_string());

    let (status, product) = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "product_name": "Widget", "category": "Tools", "release_date": "2024-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["product_id"], 1);
    assert_eq!(product["description"], Value::Null);

    let (status, page) = send(
        &app,
        "POST",
        "/landing-pages",
        Some(json!({ "variant_type": "A", "page_url": "http://x/a", "product_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["landing_page_id"], 1);

    let (status, _) = send(&app, "DELETE", "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/landing-pages/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Landing page not found");
}

#[tokio::test]
async fn dangling_foreign_key_is_conflict() {
    let (_dir, app) = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/landing-pages",
        Some(json!({ "variant_type": "A", "page_url": "http://x/a", "product_id": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn results_can_be_filtered_by_test() {
    let (_dir, app) = test_app().await;

    send(
        &app,
        "POST",
        "/products",
        Some(json!({ "product_name": "Widget", "category": "Tools", "release_date": "2024-01-01" })),
    )
    .await;
    send(
        &app,
        "POST",
        "/landing-pages",
        Some(json!({ "variant_type": "A", "page_url": "http://x/a", "product_id": 1 })),
    )
    .await;
    for name in ["Campaign_1", "Campaign_2"] {
        send(
            &app,
            "POST",
            "/ab-tests",
            Some(json!({
                "test_name": name, "start_date": "2024-02-01", "end_date": "2024-03-01",
                "landing_page_id": 1, "product_id": 1
            })),
        )
        .await;
    }
    for (test_id, rate) in [(1, 0.21), (2, 0.05), (1, 0.27)] {
        let (status, _) = send(
            &app,
            "POST",
            "/results",
            Some(json!({
                "click_through_rate": rate, "conversion_rate": 0.1, "bounce_rate": 0.4,
                "test_id": test_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/results?test_id=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("expected a JSON array");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["test_id"] == 1));

    let (status, body) = send(&app, "GET", "/results", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn null_update_fields_keep_stored_values() {
    let (_dir, app) = test_app().await;

    send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "product_name": "Widget", "category": "Tools",
            "description": "High-quality Widget", "release_date": "2024-01-01"
        })),
    )
    .await;

    // Explicit nulls mean "leave untouched", exactly like omitting the field.
    let (status, updated) = send(
        &app,
        "PUT",
        "/products/1",
        Some(json!({ "product_name": null, "category": "Hardware" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["product_name"], "Widget");
    assert_eq!(updated["category"], "Hardware");
    assert_eq!(updated["description"], "High-quality Widget");
}
