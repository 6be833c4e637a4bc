//! Catalog projections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use unicart_core::{CategoryId, ImageId, ProductId, ReviewId, UserId, VariantId};

/// Minimal category reference embedded in product payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A category with its live count of active products.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product as it appears in listings: primary image only, derived rating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub category: CategorySummary,
    pub rating: f64,
    pub reviews_count: i64,
}

/// Compact product reference returned from wishlist writes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBrief {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub image_alt: Option<String>,
}

/// A product image, full projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub id: ImageId,
    pub url: String,
    pub alt: Option<String>,
    pub sort_order: i32,
    pub is_primary: bool,
}

/// An active product variant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
    pub id: VariantId,
    pub name: String,
    pub sku: String,
    pub price: Option<Decimal>,
    pub stock_quantity: i32,
    pub attributes: Option<String>,
}

/// The reviewer's minimal profile attached to a review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerView {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

/// A review with its reviewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: ReviewId,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: ReviewerView,
}

/// Full product detail: all images ordered, active variants, reviews.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub brand: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub low_stock_threshold: i32,
    pub is_featured: bool,
    pub track_quantity: bool,
    pub allow_backorder: bool,
    pub tags: Vec<String>,
    pub images: Vec<ImageView>,
    pub category: CategorySummary,
    pub variants: Vec<VariantView>,
    pub reviews: Vec<ReviewView>,
    pub rating: f64,
    pub reviews_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
