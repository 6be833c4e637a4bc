//! Cart repository.
//!
//! One row per (user, product), enforced by the table's unique constraint.
//! Each row stores a snapshot price; the live product price is joined on
//! reads but never overwrites the snapshot outside the add path.

use rust_decimal::Decimal;
use sqlx::PgPool;

use unicart_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{CartItemView, CartProduct};

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartItemId,
    product_id: ProductId,
    quantity: i32,
    price: Decimal,
    name: String,
    slug: String,
    current_price: Decimal,
    stock_quantity: i32,
    image: Option<String>,
    image_alt: Option<String>,
}

impl From<CartRow> for CartItemView {
    fn from(r: CartRow) -> Self {
        Self {
            id: r.id,
            product_id: r.product_id,
            quantity: r.quantity,
            price: r.price,
            product: CartProduct {
                id: r.product_id,
                name: r.name,
                slug: r.slug,
                price: r.current_price,
                stock_quantity: r.stock_quantity,
                image: r.image,
                image_alt: r.image_alt,
            },
        }
    }
}

/// Join of a cart row with the live product projection.
const ITEM_SELECT: &str = "SELECT ci.id, ci.product_id, ci.quantity, ci.price, \
            p.name, p.slug, p.price AS current_price, p.stock_quantity, \
            img.url AS image, img.alt AS image_alt \
     FROM cart_items ci \
     JOIN products p ON p.id = ci.product_id \
     LEFT JOIN LATERAL ( \
         SELECT url, alt FROM product_images \
         WHERE product_id = p.id AND is_primary = TRUE \
         ORDER BY sort_order ASC LIMIT 1 \
     ) img ON TRUE";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All cart rows for a user, newest first, joined with live product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartItemView>, RepositoryError> {
        let sql = format!("{ITEM_SELECT} WHERE ci.user_id = $1 ORDER BY ci.created_at DESC");
        let rows = sqlx::query_as::<_, CartRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(CartItemView::from).collect())
    }

    /// One cart row for a (user, product) pair, joined with live product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_view(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartItemView>, RepositoryError> {
        let sql = format!("{ITEM_SELECT} WHERE ci.user_id = $1 AND ci.product_id = $2");
        let row = sqlx::query_as::<_, CartRow>(&sql)
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(CartItemView::from))
    }

    /// Add a quantity of a product to the cart.
    ///
    /// If a row exists, the quantity is incremented atomically and the
    /// snapshot price is refreshed to `price` (the product's current price).
    /// Otherwise a new row is inserted with `price` as the snapshot. A
    /// concurrent first-add losing the insert race falls back to the
    /// increment path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail.
    pub async fn upsert_add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        price: Decimal,
    ) -> Result<(), RepositoryError> {
        if self.increment(user_id, product_id, quantity, price).await? {
            return Ok(());
        }

        let inserted = sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity, price) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, product_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .execute(self.pool)
        .await?
        .rows_affected()
            > 0;

        if inserted {
            return Ok(());
        }

        // Lost the insert race to a concurrent add; the row exists now.
        self.increment(user_id, product_id, quantity, price).await?;
        Ok(())
    }

    /// Atomically add to an existing row's quantity and refresh its
    /// snapshot price. Returns `false` if no row exists.
    async fn increment(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        price: Decimal,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items \
             SET quantity = quantity + $3, price = $4, updated_at = now() \
             WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set an existing row's quantity without touching the snapshot price.
    ///
    /// Returns `false` if no row exists for the pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3, updated_at = now() \
             WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the row for a (user, product) pair.
    ///
    /// Returns `false` if no row existed; the caller reports that as
    /// not-found, never as a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
