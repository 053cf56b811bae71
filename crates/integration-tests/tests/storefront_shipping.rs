//! Integration tests for shipping rate quoting.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations + seed data applied
//! - The storefront server running (cargo run -p valroux-storefront)
//!
//! Without aggregator credentials the server answers from its static
//! fallback table, which is exactly what these tests pin down.
//!
//! Run with: cargo test -p valroux-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use valroux_integration_tests::{session_client, storefront_base_url};

/// Rates are quoted for the session cart's weight, so put a bottle in first.
async fn fill_cart(client: &Client, base_url: &str) {
    let resp = client
        .get(format!("{base_url}/api/products?in_stock=true"))
        .send()
        .await
        .expect("products request failed");
    let products: Vec<Value> = resp.json().await.expect("products body");
    let product = products.first().expect("seeded catalog is empty");

    let resp = client
        .post(format!("{base_url}/api/cart/items"))
        .json(&json!({"product_id": product["id"], "quantity": 2}))
        .send()
        .await
        .expect("add item request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_domestic_rates_sorted_by_price() {
    let client = session_client();
    let base_url = storefront_base_url();
    fill_cart(&client, &base_url).await;

    let resp = client
        .post(format!("{base_url}/api/shipping/rates"))
        .json(&json!({"country": "BE", "postal_code": "6767"}))
        .send()
        .await
        .expect("rates request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let rates: Vec<Value> = resp.json().await.expect("rates body");
    assert!(!rates.is_empty());

    let prices: Vec<i64> = rates
        .iter()
        .map(|r| r["price_cents"].as_i64().expect("price"))
        .collect();
    let mut sorted = prices.clone();
    sorted.sort_unstable();
    assert_eq!(prices, sorted);
}

#[tokio::test]
#[ignore = "Requires running storefront server without aggregator credentials"]
async fn test_fallback_rates_flagged() {
    let client = session_client();
    let base_url = storefront_base_url();
    fill_cart(&client, &base_url).await;

    let resp = client
        .post(format!("{base_url}/api/shipping/rates"))
        .json(&json!({"country": "BE", "postal_code": "1000"}))
        .send()
        .await
        .expect("rates request failed");
    let rates: Vec<Value> = resp.json().await.expect("rates body");

    assert!(rates.iter().all(|r| r["fallback"] == json!(true)));
    assert!(
        rates
            .iter()
            .any(|r| r["id"] == json!("fallback-be-bpost-home"))
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_invalid_postal_code_rejected() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/shipping/rates"))
        .json(&json!({"country": "BE", "postal_code": "not-a-code"}))
        .send()
        .await
        .expect("rates request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_delivery_options_include_estate_pickup() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/shipping/options"))
        .send()
        .await
        .expect("options request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let options: Vec<Value> = resp.json().await.expect("options body");
    assert!(options.iter().any(|o| o["id"] == json!("estate_pickup")));
}
