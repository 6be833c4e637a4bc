//! Wishlist route handlers.
//!
//! Same per-(user, product) shape as the cart without quantity or price:
//! a duplicate add is a 409 conflict, never an upsert.

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

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::db::wishlist::WishlistRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::wishlist::WishlistCreated;
use crate::state::AppState;

/// Add-to-wishlist request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistPayload {
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
}

/// Get all wishlist items for the authenticated user.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn index(
    user: RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let items = WishlistRepository::new(state.pool()).list(user.0.id).await?;

    Ok(Json(json!({
        "success": true,
        "items": items,
    })))
}

/// Add a product to the wishlist.
#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
pub async fn add(
    user: RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<AddToWishlistPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let product_id = ProductId::parse(&payload.product_id)
        .map_err(|_| AppError::NotFound("Product not found or inactive".to_owned()))?;

    let products = ProductRepository::new(state.pool());
    products
        .get_for_cart(product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound("Product not found or inactive".to_owned()))?;

    let (item_id, created_at) = WishlistRepository::new(state.pool())
        .insert(user.0.id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::Conflict("Product already in wishlist".to_owned())
            }
            other => AppError::Database(other),
        })?;

    let product = products
        .get_brief(product_id)
        .await?
        .ok_or_else(|| AppError::Internal("product missing after wishlist write".to_owned()))?;

    let item = WishlistCreated {
        id: item_id,
        product_id,
        created_at,
        product,
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "item": item,
        })),
    ))
}

/// Remove a product from the wishlist.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn remove(
    user: RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::parse(&product_id)
        .map_err(|_| AppError::NotFound("Wishlist item not found".to_owned()))?;

    let deleted = WishlistRepository::new(state.pool())
        .delete(user.0.id, product_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Wishlist item not found".to_owned()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Wishlist item removed successfully",
    })))
}
