//! Response payload types.
//!
//! These mirror the server's JSON projections; field names are camelCase on
//! the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use unicart_core::{
    CartItemId, CartSummary, CategoryId, ProductId, UserId, UserRole, WishlistItemId,
};

/// A user profile as returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub email_verified: bool,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response from login/register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

/// Live product data joined onto a cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductDto {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image: Option<String>,
    pub image_alt: Option<String>,
}

/// One cart line; `price` is the server-stored snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub product: CartProductDto,
}

/// The full cart collection with its derived summary.
#[derive(Debug, Clone, Deserialize)]
pub struct CartResponse {
    pub items: Vec<CartItemDto>,
    pub summary: CartSummary,
}

/// Category reference embedded in wishlist products.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRefDto {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// The fuller product projection wishlist reads carry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistProductDto {
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
    pub category: CategoryRefDto,
    pub rating: f64,
    pub reviews_count: i64,
}

/// One wishlist entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemDto {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub product: WishlistProductDto,
}

/// A field-level validation error as reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}
