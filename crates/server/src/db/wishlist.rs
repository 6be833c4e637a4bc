//! Wishlist repository.
//!
//! Same (user, product) uniqueness as the cart, without quantity or price.
//! A duplicate add is a conflict, never an upsert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use unicart_core::{CategoryId, ProductId, UserId, WishlistItemId, round_to_tenth};

use super::{RepositoryError, map_unique_violation};
use crate::models::product::{CategorySummary, ProductSummary};
use crate::models::wishlist::WishlistItemView;

#[derive(sqlx::FromRow)]
struct WishlistRow {
    id: WishlistItemId,
    product_id: ProductId,
    created_at: DateTime<Utc>,
    name: String,
    slug: String,
    description: Option<String>,
    short_description: Option<String>,
    brand: Option<String>,
    price: Decimal,
    compare_price: Option<Decimal>,
    stock_quantity: i32,
    is_featured: bool,
    image: Option<String>,
    image_alt: Option<String>,
    category_id: CategoryId,
    category_name: String,
    category_slug: String,
    rating: f64,
    reviews_count: i64,
}

impl From<WishlistRow> for WishlistItemView {
    fn from(r: WishlistRow) -> Self {
        Self {
            id: r.id,
            product_id: r.product_id,
            created_at: r.created_at,
            product: ProductSummary {
                id: r.product_id,
                name: r.name,
                slug: r.slug,
                description: r.description,
                short_description: r.short_description,
                brand: r.brand,
                price: r.price,
                compare_price: r.compare_price,
                stock_quantity: r.stock_quantity,
                is_featured: r.is_featured,
                image: r.image,
                image_alt: r.image_alt,
                category: CategorySummary {
                    id: r.category_id,
                    name: r.category_name,
                    slug: r.category_slug,
                },
                rating: round_to_tenth(r.rating),
                reviews_count: r.reviews_count,
            },
        }
    }
}

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All wishlist rows for a user, newest first, with the full listing
    /// projection of each product.
    ///
    /// The image falls back to the first image by sort order when no
    /// primary is flagged, unlike cart reads which require the primary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<WishlistItemView>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistRow>(
            "SELECT w.id, w.product_id, w.created_at, \
                    p.name, p.slug, p.description, p.short_description, p.brand, \
                    p.price, p.compare_price, p.stock_quantity, p.is_featured, \
                    img.url AS image, img.alt AS image_alt, \
                    c.id AS category_id, c.name AS category_name, c.slug AS category_slug, \
                    COALESCE(r.avg_rating, 0)::float8 AS rating, \
                    COALESCE(r.reviews_count, 0) AS reviews_count \
             FROM wishlist_items w \
             JOIN products p ON p.id = w.product_id \
             JOIN categories c ON c.id = p.category_id \
             LEFT JOIN LATERAL ( \
                 SELECT url, alt FROM product_images \
                 WHERE product_id = p.id \
                 ORDER BY is_primary DESC, sort_order ASC LIMIT 1 \
             ) img ON TRUE \
             LEFT JOIN ( \
                 SELECT product_id, AVG(rating)::float8 AS avg_rating, COUNT(*) AS reviews_count \
                 FROM reviews GROUP BY product_id \
             ) r ON r.product_id = p.id \
             WHERE w.user_id = $1 \
             ORDER BY w.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(WishlistItemView::from).collect())
    }

    /// Insert a wishlist row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already in the
    /// user's wishlist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(WishlistItemId, DateTime<Utc>), RepositoryError> {
        let row = sqlx::query_as::<_, (WishlistItemId, DateTime<Utc>)>(
            "INSERT INTO wishlist_items (user_id, product_id) \
             VALUES ($1, $2) \
             RETURNING id, created_at",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "already in wishlist"))?;

        Ok(row)
    }

    /// Delete the row for a (user, product) pair.
    ///
    /// Returns `false` if no row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
