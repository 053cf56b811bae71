//! Integration tests for admin auth and order management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p valroux-admin)
//! - An admin user created via `vx-cli admin create`, with its credentials
//!   in `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p valroux-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use valroux_integration_tests::{admin_base_url, session_client};

/// Log in with the credentials from the environment.
async fn authenticated_client() -> Client {
    let client = session_client();
    let base_url = admin_base_url();

    let email = std::env::var("TEST_ADMIN_EMAIL").expect("TEST_ADMIN_EMAIL not set");
    let password = std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD not set");

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_unauthenticated_requests_rejected() {
    let client = session_client();
    let base_url = admin_base_url();

    for path in ["/api/dashboard", "/api/orders", "/api/products"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_dashboard_shape() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/api/dashboard"))
        .send()
        .await
        .expect("dashboard request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("dashboard body");
    assert!(body["total_orders"].is_i64());
    assert!(body["paid_revenue_cents"].is_i64());
    assert!(body["orders_by_status"].is_array());
    assert!(body["low_stock"].is_array());
    assert!(body["recent_orders"].is_array());
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_order_list_filters_by_status() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/api/orders?status=pending&limit=10"))
        .send()
        .await
        .expect("orders request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let orders: Vec<Value> = resp.json().await.expect("orders body");
    assert!(orders.iter().all(|o| o["status"] == json!("pending")));
}

#[tokio::test]
#[ignore = "Requires running admin server, admin credentials, and a pending order"]
async fn test_invalid_status_transition_conflicts() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/api/orders?status=pending&limit=1"))
        .send()
        .await
        .expect("orders request failed");
    let orders: Vec<Value> = resp.json().await.expect("orders body");
    let order = orders.first().expect("no pending order to test against");

    // pending -> shipped skips the paid/processing steps
    let resp = client
        .patch(format!("{base_url}/api/orders/{}/status", order["id"]))
        .json(&json!({"status": "shipped"}))
        .send()
        .await
        .expect("status request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running admin server without aggregator credentials"]
async fn test_label_without_aggregator_is_bad_gateway() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/api/orders?limit=1"))
        .send()
        .await
        .expect("orders request failed");
    let orders: Vec<Value> = resp.json().await.expect("orders body");
    let order = orders.first().expect("no order to test against");

    let resp = client
        .post(format!("{base_url}/api/shipping/labels"))
        .json(&json!({"order_id": order["id"]}))
        .send()
        .await
        .expect("label request failed");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}
