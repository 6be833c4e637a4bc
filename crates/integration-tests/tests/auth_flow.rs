//! Integration tests for registration and login.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p unicart-server)
//!
//! Run with: cargo test -p unicart-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;

use unicart_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_then_login_roundtrip() {
    let ctx = TestContext::new();
    let email = TestContext::unique_email("roundtrip");

    let (register_token, registered) = ctx.register_customer(&email, "hunter2hunter2").await;
    assert!(!register_token.is_empty());
    assert_eq!(registered["email"], email);
    assert_eq!(registered["role"], "CUSTOMER");

    let (login_token, logged_in) = ctx.login(&email, "hunter2hunter2").await;
    assert!(!login_token.is_empty());

    // Same identity on both sides of the roundtrip
    assert_eq!(logged_in["id"], registered["id"]);
    assert_eq!(logged_in["email"], registered["email"]);
    assert_eq!(logged_in["role"], registered["role"]);

    // The token resolves to the same active user through the auth gate
    let resp = ctx
        .client
        .get(format!("{}/cart", ctx.base_url))
        .bearer_auth(&login_token)
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new();
    let email = TestContext::unique_email("duplicate");

    ctx.register_customer(&email, "hunter2hunter2").await;

    let resp = ctx
        .client
        .post(format!("{}/auth/register", ctx.base_url))
        .json(&json!({ "email": email, "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_email_uniqueness_is_case_insensitive() {
    let ctx = TestContext::new();
    let email = TestContext::unique_email("casefold");

    ctx.register_customer(&email, "hunter2hunter2").await;

    let resp = ctx
        .client
        .post(format!("{}/auth/register", ctx.base_url))
        .json(&json!({ "email": email.to_uppercase(), "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_wrong_password_unauthorized() {
    let ctx = TestContext::new();
    let email = TestContext::unique_email("badpass");

    ctx.register_customer(&email, "hunter2hunter2").await;

    let resp = ctx
        .client
        .post(format!("{}/auth/login", ctx.base_url))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_validation_details() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(format!("{}/auth/register", ctx.base_url))
        .json(&json!({ "email": "not-an-email", "password": "123" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = resp.json().await.expect("error body should be JSON");
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"].as_array().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_protected_route_rejects_missing_and_garbage_tokens() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!("{}/cart", ctx.base_url))
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx
        .client
        .get(format!("{}/cart", ctx.base_url))
        .bearer_auth("not.a.valid.token")
        .send()
        .await
        .expect("cart request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_admin_surface_requires_admin_role() {
    let ctx = TestContext::new();
    let email = TestContext::unique_email("customer");
    let (token, _) = ctx.register_customer(&email, "hunter2hunter2").await;

    // A plain customer is authenticated but not authorized
    let resp = ctx
        .client
        .post(format!("{}/admin/products", ctx.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "categoryId": ctx.any_category_id().await,
            "name": "Nope",
            "slug": "nope",
            "sku": "NOPE-1",
            "price": "1.00"
        }))
        .send()
        .await
        .expect("admin request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
