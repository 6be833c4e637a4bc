//! Product route handlers (public catalog reads).

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use unicart_core::ProductId;

use crate::db::products::{ProductFilters, ProductRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 20;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List active products with optional filters and offset pagination.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);

    let filters = ProductFilters {
        featured: query.featured.unwrap_or(false),
        category_slug: query.category,
        page,
        limit,
    };

    let (products, total) = ProductRepository::new(state.pool()).list(&filters).await?;
    let divisor = i64::from(limit);
    let pages = (total + divisor - 1) / divisor;

    Ok(Json(json!({
        "success": true,
        "products": products,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "pages": pages,
        },
    })))
}

/// Full detail for a single product.
///
/// An inactive product is reported exactly like a missing one.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = ProductId::parse(&id).map_err(|_| AppError::NotFound("Product not found".to_owned()))?;

    let product = ProductRepository::new(state.pool())
        .get_detail(id, false)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(json!({
        "success": true,
        "product": product,
    })))
}
