//! Wishlist projections.

use chrono::{DateTime, Utc};
use serde::Serialize;

use unicart_core::{ProductId, WishlistItemId};

use super::product::{ProductBrief, ProductSummary};

/// One wishlist entry with the full listing projection of its product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemView {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub product: ProductSummary,
}

/// The response to a successful wishlist add: compact product reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistCreated {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub product: ProductBrief,
}
