//! Integration tests for the catalog reader.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied and the
//!   catalog seeded
//! - The server running (cargo run -p unicart-server)
//! - `ADMIN_PASSWORD` set for the tests that create/deactivate fixtures
//!
//! Run with: cargo test -p unicart-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::Value;

use unicart_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_listing_shape_and_pagination() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!("{}/products?page=1&limit=2", ctx.base_url))
        .send()
        .await
        .expect("products request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("products body should be JSON");
    assert_eq!(body["success"], true);
    assert!(body["products"].as_array().is_some_and(|p| p.len() <= 2));
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 2);
    assert!(body["pagination"]["total"].is_number());
    assert!(body["pagination"]["pages"].is_number());
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_featured_filter_only_returns_featured() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!("{}/products?featured=true", ctx.base_url))
        .send()
        .await
        .expect("products request failed");
    let body: Value = resp.json().await.expect("products body should be JSON");

    for product in body["products"].as_array().expect("products array") {
        assert_eq!(product["isFeatured"], true);
    }
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_category_filter_matches_slug() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!("{}/products?category=electronics", ctx.base_url))
        .send()
        .await
        .expect("products request failed");
    let body: Value = resp.json().await.expect("products body should be JSON");

    for product in body["products"].as_array().expect("products array") {
        assert_eq!(product["category"]["slug"], "electronics");
    }
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_categories_carry_live_product_counts() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!("{}/categories", ctx.base_url))
        .send()
        .await
        .expect("categories request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("categories body should be JSON");
    let categories = body["categories"].as_array().expect("categories array");
    assert!(!categories.is_empty());
    for category in categories {
        assert!(category["productCount"].is_number());
    }
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_unknown_product_detail_is_not_found() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!(
            "{}/products/00000000-0000-0000-0000-000000000000",
            ctx.base_url
        ))
        .send()
        .await
        .expect("product request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server, seeded database, and seeded admin"]
async fn test_deactivated_product_vanishes_from_all_reads() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;

    let product_id = ctx.create_product(&admin, "15.00", 10).await;

    // Visible while active
    let resp = ctx
        .client
        .get(format!("{}/products/{product_id}", ctx.base_url))
        .send()
        .await
        .expect("product request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Soft-deactivate through the admin surface
    let resp = ctx
        .client
        .delete(format!("{}/admin/products/{product_id}", ctx.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("admin delete failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Detail now reports not-found, identically to a missing product
    let resp = ctx
        .client
        .get(format!("{}/products/{product_id}", ctx.base_url))
        .send()
        .await
        .expect("product request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // And the listing never returns it
    let resp = ctx
        .client
        .get(format!("{}/products?limit=1000", ctx.base_url))
        .send()
        .await
        .expect("products request failed");
    let body: Value = resp.json().await.expect("products body should be JSON");
    let listed = body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .any(|p| p["id"] == product_id.as_str());
    assert!(!listed);
}
