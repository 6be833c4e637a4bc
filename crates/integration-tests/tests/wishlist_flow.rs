//! Integration tests for the wishlist engine.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied and the
//!   catalog seeded
//! - The server running (cargo run -p unicart-server)
//!
//! Run with: cargo test -p unicart-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use unicart_integration_tests::TestContext;

async fn fresh_customer(ctx: &TestContext) -> String {
    let email = TestContext::unique_email("wishlist");
    let (token, _) = ctx.register_customer(&email, "hunter2hunter2").await;
    token
}

async fn add_to_wishlist(ctx: &TestContext, token: &str, product_id: &str) -> reqwest::Response {
    ctx.client
        .post(format!("{}/wishlist", ctx.base_url))
        .bearer_auth(token)
        .json(&json!({ "productId": product_id }))
        .send()
        .await
        .expect("add-to-wishlist request failed")
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_duplicate_add_conflicts_never_duplicates() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    let resp = add_to_wishlist(&ctx, &token, &product_id).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Second add is a conflict, not an upsert
    let resp = add_to_wishlist(&ctx, &token, &product_id).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("error body should be JSON");
    assert_eq!(body["error"], "Product already in wishlist");

    // Still exactly one entry
    let resp = ctx
        .client
        .get(format!("{}/wishlist", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get-wishlist request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("wishlist body should be JSON");
    let matching = body["items"]
        .as_array()
        .expect("items array")
        .iter()
        .filter(|i| i["productId"] == product_id.as_str())
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_remove_absent_entry_is_not_found() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    let resp = ctx
        .client
        .delete(format!("{}/wishlist/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_add_then_remove_then_remove_again() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    let resp = add_to_wishlist(&ctx, &token, &product_id).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ctx
        .client
        .delete(format!("{}/wishlist/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .delete(format!("{}/wishlist/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_wishlist_items_carry_rating_and_category() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    add_to_wishlist(&ctx, &token, &product_id).await;

    let resp = ctx
        .client
        .get(format!("{}/wishlist", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get-wishlist request failed");
    let body: Value = resp.json().await.expect("wishlist body should be JSON");
    let product = &body["items"][0]["product"];

    assert!(product["rating"].is_number());
    assert!(product["reviewsCount"].is_number());
    assert!(product["category"]["slug"].is_string());
}
