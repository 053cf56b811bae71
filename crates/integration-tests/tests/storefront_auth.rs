//! Integration tests for storefront customer auth.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p valroux-storefront)
//!
//! Run with: cargo test -p valroux-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use valroux_integration_tests::{session_client, storefront_base_url, unique_email};

fn register_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "correct horse battery",
        "first_name": "Anna",
        "last_name": "Peeters",
        "birth_date": "1990-04-02",
        "marketing_consent": false
    })
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_register_login_me_logout_flow() {
    let client = session_client();
    let base_url = storefront_base_url();
    let email = unique_email("auth-flow");

    // Register sets the session
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register_body(&email))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Session cookie authenticates /me
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("me body");
    assert_eq!(body["email"], json!(email));

    // Logout clears it
    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Login restores it
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({"email": email, "password": "correct horse battery"}))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_register_rejects_minor() {
    let client = session_client();
    let base_url = storefront_base_url();

    let mut body = register_body(&unique_email("minor"));
    body["birth_date"] = json!("2015-06-01");

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&body)
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_duplicate_email_conflicts() {
    let client = session_client();
    let base_url = storefront_base_url();
    let email = unique_email("duplicate");

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register_body(&email))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register_body(&email))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_password_unauthorized() {
    let client = session_client();
    let base_url = storefront_base_url();
    let email = unique_email("wrong-pass");

    client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register_body(&email))
        .send()
        .await
        .expect("register request failed");

    let resp = session_client()
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({"email": email, "password": "not the password"}))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
