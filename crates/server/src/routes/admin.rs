//! Admin product CRUD route handlers.
//!
//! All handlers require the administrative role via [`RequireAdmin`].
//! Deletion is a soft-deactivate: the product disappears from every public
//! read path but keeps its rows.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use validator::{Validate, ValidationError};

use unicart_core::{CategoryId, ProductId};

use crate::db::RepositoryError;
use crate::db::products::{NewProduct, NewProductImage, ProductChanges, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// One image in a create-product request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    #[validate(length(min = 1, message = "Image URL is required"))]
    pub url: String,
    pub alt: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_primary: bool,
}

/// Create-product request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub category_id: CategoryId,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub brand: Option<String>,
    #[validate(custom = "validate_positive_price")]
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub track_quantity: bool,
    #[serde(default)]
    pub allow_backorder: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate]
    pub images: Vec<ImagePayload>,
}

const fn default_true() -> bool {
    true
}

/// Update-product request body; absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub category_id: Option<CategoryId>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub brand: Option<String>,
    #[validate(custom = "validate_optional_positive_price")]
    pub price: Option<Decimal>,
    pub compare_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub track_quantity: Option<bool>,
    pub allow_backorder: Option<bool>,
    pub tags: Option<Vec<String>>,
}

fn validate_positive_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive");
        err.message = Some("Price must be greater than zero".into());
        Err(err)
    }
}

fn validate_optional_positive_price(
    price: &Decimal,
) -> std::result::Result<(), ValidationError> {
    validate_positive_price(price)
}

/// Create a product with its images.
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.0.id))]
pub async fn create_product(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let new = NewProduct {
        category_id: payload.category_id,
        name: payload.name,
        slug: payload.slug,
        sku: payload.sku,
        description: payload.description,
        short_description: payload.short_description,
        brand: payload.brand,
        price: payload.price,
        compare_price: payload.compare_price,
        stock_quantity: payload.stock_quantity,
        is_featured: payload.is_featured,
        track_quantity: payload.track_quantity,
        allow_backorder: payload.allow_backorder,
        tags: payload.tags,
        images: payload
            .images
            .into_iter()
            .map(|i| NewProductImage {
                url: i.url,
                alt: i.alt,
                sort_order: i.sort_order,
                is_primary: i.is_primary,
            })
            .collect(),
    };

    let repo = ProductRepository::new(state.pool());
    let id = repo.create(&new).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => {
            AppError::Conflict("Slug or SKU already exists".to_owned())
        }
        other => AppError::Database(other),
    })?;

    tracing::info!(product_id = %id, "product created");

    let product = repo
        .get_detail(id, true)
        .await?
        .ok_or_else(|| AppError::Internal("product missing after create".to_owned()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "product": product,
        })),
    ))
}

/// Apply a partial update to a product.
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.0.id))]
pub async fn update_product(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let id =
        ProductId::parse(&id).map_err(|_| AppError::NotFound("Product not found".to_owned()))?;

    let changes = ProductChanges {
        category_id: payload.category_id,
        name: payload.name,
        description: payload.description,
        short_description: payload.short_description,
        brand: payload.brand,
        price: payload.price,
        compare_price: payload.compare_price,
        stock_quantity: payload.stock_quantity,
        is_active: payload.is_active,
        is_featured: payload.is_featured,
        track_quantity: payload.track_quantity,
        allow_backorder: payload.allow_backorder,
        tags: payload.tags,
    };

    let repo = ProductRepository::new(state.pool());
    let found = repo.update(id, &changes).await?;
    if !found {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    let product = repo
        .get_detail(id, true)
        .await?
        .ok_or_else(|| AppError::Internal("product missing after update".to_owned()))?;

    Ok(Json(json!({
        "success": true,
        "product": product,
    })))
}

/// Soft-deactivate a product.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn delete_product(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id =
        ProductId::parse(&id).map_err(|_| AppError::NotFound("Product not found".to_owned()))?;

    let found = ProductRepository::new(state.pool()).deactivate(id).await?;
    if !found {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    tracing::info!(product_id = %id, "product deactivated");

    Ok(Json(json!({
        "success": true,
        "message": "Product deactivated",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload() -> CreateProductPayload {
        serde_json::from_str(
            r#"{
                "categoryId": "2b8e6a10-4c63-4a2e-9f0a-1d2c3b4a5e6f",
                "name": "Wireless Headphones Pro",
                "slug": "wireless-headphones-pro",
                "sku": "AUD-001",
                "price": "99.99",
                "stockQuantity": 50
            }"#,
        )
        .expect("should deserialize")
    }

    #[test]
    fn test_create_payload_valid() {
        assert!(base_payload().validate().is_ok());
    }

    #[test]
    fn test_create_payload_defaults() {
        let payload = base_payload();
        assert!(payload.track_quantity);
        assert!(!payload.is_featured);
        assert!(payload.tags.is_empty());
        assert!(payload.images.is_empty());
    }

    #[test]
    fn test_create_payload_rejects_zero_price() {
        let mut payload = base_payload();
        payload.price = Decimal::ZERO;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_payload_rejects_empty_name() {
        let mut payload = base_payload();
        payload.name = String::new();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_payload_rejects_negative_stock() {
        let mut payload = base_payload();
        payload.stock_quantity = -1;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_payload_all_absent_is_valid() {
        let payload: UpdateProductPayload =
            serde_json::from_str("{}").expect("should deserialize");
        assert!(payload.validate().is_ok());
    }
}
