//! Integration tests for the cart engine.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied and the
//!   catalog seeded
//! - The server running (cargo run -p unicart-server)
//! - `ADMIN_PASSWORD` set for the tests that create fixture products
//!
//! Run with: cargo test -p unicart-integration-tests -- --ignored

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use unicart_integration_tests::TestContext;

async fn fresh_customer(ctx: &TestContext) -> String {
    let email = TestContext::unique_email("cart");
    let (token, _) = ctx.register_customer(&email, "hunter2hunter2").await;
    token
}

async fn add_to_cart(ctx: &TestContext, token: &str, product_id: &str, quantity: i64) -> reqwest::Response {
    ctx.client
        .post(format!("{}/cart", ctx.base_url))
        .bearer_auth(token)
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("add-to-cart request failed")
}

async fn get_cart(ctx: &TestContext, token: &str) -> Value {
    let resp = ctx
        .client
        .get(format!("{}/cart", ctx.base_url))
        .bearer_auth(token)
        .send()
        .await
        .expect("get-cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("cart body should be JSON")
}

fn dec(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal fields serialize as strings")
        .parse()
        .expect("valid decimal")
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_double_add_sums_quantity_into_one_row() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    let resp = add_to_cart(&ctx, &token, &product_id, 2).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = add_to_cart(&ctx, &token, &product_id, 3).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let cart = get_cart(&ctx, &token).await;
    let items = cart["items"].as_array().expect("items array");

    // Exactly one row for the pair, with the summed quantity
    let rows: Vec<&Value> = items
        .iter()
        .filter(|i| i["productId"] == product_id.as_str())
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quantity"], 5);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_summary_arithmetic() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    add_to_cart(&ctx, &token, &product_id, 2).await;

    let cart = get_cart(&ctx, &token).await;
    let items = cart["items"].as_array().expect("items array");
    let summary = &cart["summary"];

    let expected_subtotal: Decimal = items
        .iter()
        .map(|i| dec(&i["price"]) * Decimal::from(i["quantity"].as_i64().expect("quantity")))
        .sum();

    let subtotal = dec(&summary["subtotal"]);
    let shipping = dec(&summary["shipping"]);
    let tax = dec(&summary["tax"]);
    let total = dec(&summary["total"]);

    assert_eq!(subtotal, expected_subtotal);
    if subtotal >= Decimal::new(50, 0) {
        assert_eq!(shipping, Decimal::ZERO);
    } else {
        assert_eq!(shipping, Decimal::new(999, 2));
    }
    assert_eq!(total, subtotal + shipping + tax);
}

#[tokio::test]
#[ignore = "Requires running server, seeded database, and seeded admin"]
async fn test_summary_scenario_values() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let token = fresh_customer(&ctx).await;

    // $49.00 subtotal -> shipping $9.99, tax $3.92, total $62.91
    let product_id = ctx.create_product(&admin, "49.00", 100).await;
    add_to_cart(&ctx, &token, &product_id, 1).await;

    let summary = get_cart(&ctx, &token).await["summary"].clone();
    assert_eq!(dec(&summary["subtotal"]), "49.00".parse().expect("decimal"));
    assert_eq!(dec(&summary["shipping"]), "9.99".parse().expect("decimal"));
    assert_eq!(dec(&summary["tax"]), "3.92".parse().expect("decimal"));
    assert_eq!(dec(&summary["total"]), "62.91".parse().expect("decimal"));

    // $60.00 subtotal -> free shipping, tax $4.80, total $64.80
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.create_product(&admin, "60.00", 100).await;
    add_to_cart(&ctx, &token, &product_id, 1).await;

    let summary = get_cart(&ctx, &token).await["summary"].clone();
    assert_eq!(dec(&summary["shipping"]), Decimal::ZERO);
    assert_eq!(dec(&summary["tax"]), "4.80".parse().expect("decimal"));
    assert_eq!(dec(&summary["total"]), "64.80".parse().expect("decimal"));
}

#[tokio::test]
#[ignore = "Requires running server, seeded database, and seeded admin"]
async fn test_stock_check_validates_increment_not_cumulative() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let token = fresh_customer(&ctx).await;

    // stock 5: each add of 3 passes the increment-only check, even though
    // the cumulative quantity (6) exceeds stock
    let product_id = ctx.create_product(&admin, "10.00", 5).await;

    let resp = add_to_cart(&ctx, &token, &product_id, 3).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = add_to_cart(&ctx, &token, &product_id, 3).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let cart = get_cart(&ctx, &token).await;
    assert_eq!(cart["items"][0]["quantity"], 6);

    // A single increment larger than stock is rejected
    let resp = add_to_cart(&ctx, &token, &product_id, 6).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("error body should be JSON");
    assert_eq!(body["error"], "Insufficient stock");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_set_quantity_requires_existing_row() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    let resp = ctx
        .client
        .put(format!("{}/cart/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_set_quantity_zero_is_rejected_not_removal() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    add_to_cart(&ctx, &token, &product_id, 1).await;

    let resp = ctx
        .client
        .put(format!("{}/cart/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The row is still there, untouched
    let cart = get_cart(&ctx, &token).await;
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_remove_absent_row_is_not_found_never_silent() {
    let ctx = TestContext::new();
    let token = fresh_customer(&ctx).await;
    let product_id = ctx.any_product_id().await;

    add_to_cart(&ctx, &token, &product_id, 1).await;

    let resp = ctx
        .client
        .delete(format!("{}/cart/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Double removal surfaces as 404
    let resp = ctx
        .client
        .delete(format!("{}/cart/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server, seeded database, and seeded admin"]
async fn test_snapshot_price_survives_product_price_change() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let token = fresh_customer(&ctx).await;

    let product_id = ctx.create_product(&admin, "20.00", 100).await;
    add_to_cart(&ctx, &token, &product_id, 1).await;

    // Raise the live price after the snapshot was taken
    let resp = ctx
        .client
        .put(format!("{}/admin/products/{product_id}", ctx.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "price": "25.00" }))
        .send()
        .await
        .expect("admin update failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = get_cart(&ctx, &token).await;
    let item = &cart["items"][0];
    // Snapshot is unchanged; the joined live price reflects the update
    assert_eq!(dec(&item["price"]), "20.00".parse().expect("decimal"));
    assert_eq!(dec(&item["product"]["price"]), "25.00".parse().expect("decimal"));

    // SetQuantity must not refresh the snapshot...
    let resp = ctx
        .client
        .put(format!("{}/cart/{product_id}", ctx.base_url))
        .bearer_auth(&token)
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart = get_cart(&ctx, &token).await;
    assert_eq!(dec(&cart["items"][0]["price"]), "20.00".parse().expect("decimal"));

    // ...but a re-add does
    add_to_cart(&ctx, &token, &product_id, 1).await;
    let cart = get_cart(&ctx, &token).await;
    assert_eq!(dec(&cart["items"][0]["price"]), "25.00".parse().expect("decimal"));
}
