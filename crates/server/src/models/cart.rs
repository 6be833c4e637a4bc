//! Cart projections.

use rust_decimal::Decimal;
use serde::Serialize;

use unicart_core::{CartItemId, CartSummary, ProductId};

/// Live product data joined onto a cart row.
///
/// `price` here is the product's *current* price; the row's own `price`
/// field is the snapshot captured when the item was added. The two may
/// legitimately differ.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image: Option<String>,
    pub image_alt: Option<String>,
}

/// One cart line: the stored snapshot plus live product data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Snapshot unit price captured at add/re-add time.
    pub price: Decimal,
    pub product: CartProduct,
}

/// The full cart response: all lines plus the derived summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: CartSummary,
}

impl CartView {
    /// Assemble the response, deriving the summary from snapshot prices.
    #[must_use]
    pub fn new(items: Vec<CartItemView>) -> Self {
        let summary = CartSummary::from_lines(items.iter().map(|i| (i.price, i.quantity)));
        Self { items, summary }
    }
}
