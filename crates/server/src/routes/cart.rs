//! Cart route handlers.
//!
//! State machine per (user, product) pair: absent -> present(quantity >= 1)
//! -> absent. Add increments an existing row and refreshes its snapshot
//! price; SetQuantity leaves the snapshot untouched; Remove on an absent
//! pair is a 404, never a silent no-op.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use validator::Validate;

use unicart_core::ProductId;

use crate::db::cart::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::CartView;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Set-quantity request body.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartPayload {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Get all cart items for the authenticated user, plus the derived summary.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn index(
    user: RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let items = CartRepository::new(state.pool()).list(user.0.id).await?;
    let view = CartView::new(items);

    Ok(Json(json!({
        "success": true,
        "items": view.items,
        "summary": view.summary,
    })))
}

/// Add an item to the cart.
///
/// The stock check validates the requested quantity against total stock; a
/// re-add of an already-present product is not re-validated against the new
/// cumulative quantity, only the increment.
#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
pub async fn add(
    user: RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<AddToCartPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let product_id = ProductId::parse(&payload.product_id)
        .map_err(|_| AppError::NotFound("Product not found or inactive".to_owned()))?;

    let products = ProductRepository::new(state.pool());
    let product = products
        .get_for_cart(product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound("Product not found or inactive".to_owned()))?;

    if product.track_quantity && product.stock_quantity < payload.quantity {
        return Err(AppError::BusinessRule("Insufficient stock".to_owned()));
    }

    let cart = CartRepository::new(state.pool());
    cart.upsert_add(user.0.id, product_id, payload.quantity, product.price)
        .await?;

    let item = cart
        .get_view(user.0.id, product_id)
        .await?
        .ok_or_else(|| AppError::Internal("cart item missing after write".to_owned()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "item": item,
        })),
    ))
}

/// Set the quantity of an existing cart item.
///
/// The snapshot price is not touched; a quantity of 0 is a validation
/// error, not an implicit removal.
#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
pub async fn update(
    user: RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateCartPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let product_id = ProductId::parse(&product_id)
        .map_err(|_| AppError::NotFound("Cart item not found".to_owned()))?;

    let cart = CartRepository::new(state.pool());
    let found = cart
        .set_quantity(user.0.id, product_id, payload.quantity)
        .await?;
    if !found {
        return Err(AppError::NotFound("Cart item not found".to_owned()));
    }

    let item = cart
        .get_view(user.0.id, product_id)
        .await?
        .ok_or_else(|| AppError::Internal("cart item missing after write".to_owned()))?;

    Ok(Json(json!({
        "success": true,
        "item": item,
    })))
}

/// Remove an item from the cart.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn remove(
    user: RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::parse(&product_id)
        .map_err(|_| AppError::NotFound("Cart item not found".to_owned()))?;

    let deleted = CartRepository::new(state.pool())
        .delete(user.0.id, product_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Cart item not found".to_owned()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Cart item removed successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_payload_defaults_quantity_to_one() {
        let payload: AddToCartPayload =
            serde_json::from_str(r#"{"productId": "abc"}"#).expect("should deserialize");
        assert_eq!(payload.quantity, 1);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_add_payload_rejects_zero_quantity() {
        let payload: AddToCartPayload =
            serde_json::from_str(r#"{"productId": "abc", "quantity": 0}"#)
                .expect("should deserialize");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_add_payload_rejects_negative_quantity() {
        let payload: AddToCartPayload =
            serde_json::from_str(r#"{"productId": "abc", "quantity": -2}"#)
                .expect("should deserialize");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_add_payload_rejects_empty_product_id() {
        let payload: AddToCartPayload =
            serde_json::from_str(r#"{"productId": ""}"#).expect("should deserialize");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_payload_rejects_zero() {
        let payload = UpdateCartPayload { quantity: 0 };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_payload_accepts_one() {
        let payload = UpdateCartPayload { quantity: 1 };
        assert!(payload.validate().is_ok());
    }
}
