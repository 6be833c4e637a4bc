//! Product repository.
//!
//! All read paths filter on `is_active`; an inactive product is
//! indistinguishable from a missing one everywhere except the admin
//! operations, which see the full table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use unicart_core::{
    CategoryId, ImageId, ProductId, ReviewId, UserId, VariantId, round_rating, round_to_tenth,
};

use super::{RepositoryError, map_unique_violation};
use crate::models::product::{
    CategorySummary, ImageView, ProductBrief, ProductDetail, ProductSummary, ReviewView,
    ReviewerView, VariantView,
};

/// Filters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub featured: bool,
    pub category_slug: Option<String>,
    pub page: u32,
    pub limit: u32,
}

/// The fields the cart and wishlist engines need before accepting a product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductForCart {
    pub id: ProductId,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub track_quantity: bool,
    pub is_active: bool,
}

/// Input for creating a product with its images.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub track_quantity: bool,
    pub allow_backorder: bool,
    pub tags: Vec<String>,
    pub images: Vec<NewProductImage>,
}

/// Input for one image row attached to a new product.
#[derive(Debug, Clone)]
pub struct NewProductImage {
    pub url: String,
    pub alt: Option<String>,
    pub sort_order: i32,
    pub is_primary: bool,
}

/// Partial update of a product's mutable fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub compare_price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub track_quantity: Option<bool>,
    pub allow_backorder: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(sqlx::FromRow)]
struct ProductListRow {
    id: ProductId,
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

impl From<ProductListRow> for ProductSummary {
    fn from(r: ProductListRow) -> Self {
        Self {
            id: r.id,
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
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductDetailRow {
    id: ProductId,
    name: String,
    slug: String,
    description: Option<String>,
    short_description: Option<String>,
    brand: Option<String>,
    sku: String,
    price: Decimal,
    compare_price: Option<Decimal>,
    stock_quantity: i32,
    low_stock_threshold: i32,
    is_featured: bool,
    track_quantity: bool,
    allow_backorder: bool,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_id: CategoryId,
    category_name: String,
    category_slug: String,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: ImageId,
    url: String,
    alt: Option<String>,
    sort_order: i32,
    is_primary: bool,
}

#[derive(sqlx::FromRow)]
struct VariantRow {
    id: VariantId,
    name: String,
    sku: String,
    price: Option<Decimal>,
    stock_quantity: i32,
    attributes: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    rating: i32,
    title: Option<String>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    user_id: UserId,
    first_name: Option<String>,
    last_name: Option<String>,
    email: String,
}

/// Shared SELECT for the listing projection: product + category + primary
/// image + review aggregates.
const LIST_SELECT: &str = "SELECT p.id, p.name, p.slug, p.description, p.short_description, p.brand, \
            p.price, p.compare_price, p.stock_quantity, p.is_featured, \
            img.url AS image, img.alt AS image_alt, \
            c.id AS category_id, c.name AS category_name, c.slug AS category_slug, \
            COALESCE(r.avg_rating, 0)::float8 AS rating, \
            COALESCE(r.reviews_count, 0) AS reviews_count \
     FROM products p \
     JOIN categories c ON c.id = p.category_id \
     LEFT JOIN LATERAL ( \
         SELECT url, alt FROM product_images \
         WHERE product_id = p.id AND is_primary = TRUE \
         ORDER BY sort_order ASC LIMIT 1 \
     ) img ON TRUE \
     LEFT JOIN ( \
         SELECT product_id, AVG(rating)::float8 AS avg_rating, COUNT(*) AS reviews_count \
         FROM reviews GROUP BY product_id \
     ) r ON r.product_id = p.id \
     WHERE p.is_active = TRUE";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products matching the filters, newest first, with the
    /// total count for pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filters: &ProductFilters,
    ) -> Result<(Vec<ProductSummary>, i64), RepositoryError> {
        let page = filters.page.max(1);
        let limit = i64::from(filters.limit.max(1));
        let offset = i64::from(page - 1) * limit;

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(LIST_SELECT);
        push_filters(&mut query, filters);
        query
            .push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<ProductListRow> = query.build_query_as().fetch_all(self.pool).await?;

        let mut count: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM products p \
             JOIN categories c ON c.id = p.category_id \
             WHERE p.is_active = TRUE",
        );
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        Ok((rows.into_iter().map(ProductSummary::from).collect(), total))
    }

    /// Get the full detail projection for a product.
    ///
    /// With `include_inactive = false` an inactive product is reported as
    /// absent, exactly like a missing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_detail(
        &self,
        id: ProductId,
        include_inactive: bool,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let mut sql = String::from(
            "SELECT p.id, p.name, p.slug, p.description, p.short_description, p.brand, \
                    p.sku, p.price, p.compare_price, p.stock_quantity, p.low_stock_threshold, \
                    p.is_featured, p.track_quantity, p.allow_backorder, p.tags, \
                    p.created_at, p.updated_at, \
                    c.id AS category_id, c.name AS category_name, c.slug AS category_slug \
             FROM products p \
             JOIN categories c ON c.id = p.category_id \
             WHERE p.id = $1",
        );
        if !include_inactive {
            sql.push_str(" AND p.is_active = TRUE");
        }

        let Some(product) = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let images = sqlx::query_as::<_, ImageRow>(
            "SELECT id, url, alt, sort_order, is_primary FROM product_images \
             WHERE product_id = $1 ORDER BY sort_order ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let variants = sqlx::query_as::<_, VariantRow>(
            "SELECT id, name, sku, price, stock_quantity, attributes FROM product_variants \
             WHERE product_id = $1 AND is_active = TRUE ORDER BY created_at ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let reviews = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.rating, r.title, r.comment, r.created_at, \
                    u.id AS user_id, u.first_name, u.last_name, u.email \
             FROM reviews r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.product_id = $1 \
             ORDER BY r.created_at DESC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
        let rating = round_rating(&ratings);
        let reviews_count = reviews.len() as i64;

        Ok(Some(ProductDetail {
            id: product.id,
            name: product.name,
            slug: product.slug,
            description: product.description,
            short_description: product.short_description,
            brand: product.brand,
            sku: product.sku,
            price: product.price,
            compare_price: product.compare_price,
            stock_quantity: product.stock_quantity,
            low_stock_threshold: product.low_stock_threshold,
            is_featured: product.is_featured,
            track_quantity: product.track_quantity,
            allow_backorder: product.allow_backorder,
            tags: product.tags,
            images: images
                .into_iter()
                .map(|i| ImageView {
                    id: i.id,
                    url: i.url,
                    alt: i.alt,
                    sort_order: i.sort_order,
                    is_primary: i.is_primary,
                })
                .collect(),
            category: CategorySummary {
                id: product.category_id,
                name: product.category_name,
                slug: product.category_slug,
            },
            variants: variants
                .into_iter()
                .map(|v| VariantView {
                    id: v.id,
                    name: v.name,
                    sku: v.sku,
                    price: v.price,
                    stock_quantity: v.stock_quantity,
                    attributes: v.attributes,
                })
                .collect(),
            reviews: reviews
                .into_iter()
                .map(|r| ReviewView {
                    id: r.id,
                    rating: r.rating,
                    title: r.title,
                    comment: r.comment,
                    created_at: r.created_at,
                    user: ReviewerView {
                        id: r.user_id,
                        first_name: r.first_name,
                        last_name: r.last_name,
                        email: r.email,
                    },
                })
                .collect(),
            rating,
            reviews_count,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }))
    }

    /// Fetch the fields the cart/wishlist engines validate before a write.
    ///
    /// Returns the row even for inactive products; callers decide how to
    /// report the active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_cart(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductForCart>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductForCart>(
            "SELECT id, price, stock_quantity, track_quantity, is_active \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Compact projection for wishlist write responses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_brief(&self, id: ProductId) -> Result<Option<ProductBrief>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct BriefRow {
            id: ProductId,
            name: String,
            slug: String,
            price: Decimal,
            image: Option<String>,
            image_alt: Option<String>,
        }

        let row = sqlx::query_as::<_, BriefRow>(
            "SELECT p.id, p.name, p.slug, p.price, img.url AS image, img.alt AS image_alt \
             FROM products p \
             LEFT JOIN LATERAL ( \
                 SELECT url, alt FROM product_images \
                 WHERE product_id = p.id AND is_primary = TRUE \
                 ORDER BY sort_order ASC LIMIT 1 \
             ) img ON TRUE \
             WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| ProductBrief {
            id: r.id,
            name: r.name,
            slug: r.slug,
            price: r.price,
            image: r.image,
            image_alt: r.image_alt,
        }))
    }

    /// Create a product and its images in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or SKU is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewProduct) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, ProductId>(
            "INSERT INTO products (category_id, name, slug, sku, description, \
                 short_description, brand, price, compare_price, stock_quantity, \
                 is_featured, track_quantity, allow_backorder, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING id",
        )
        .bind(new.category_id)
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.sku)
        .bind(&new.description)
        .bind(&new.short_description)
        .bind(&new.brand)
        .bind(new.price)
        .bind(new.compare_price)
        .bind(new.stock_quantity)
        .bind(new.is_featured)
        .bind(new.track_quantity)
        .bind(new.allow_backorder)
        .bind(&new.tags)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "slug or sku already exists"))?;

        for image in &new.images {
            sqlx::query(
                "INSERT INTO product_images (product_id, url, alt, sort_order, is_primary) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(&image.url)
            .bind(&image.alt)
            .bind(image.sort_order)
            .bind(image.is_primary)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(id)
    }

    /// Apply a partial update. Returns `false` if the product doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET \
                 category_id = COALESCE($2, category_id), \
                 name = COALESCE($3, name), \
                 description = COALESCE($4, description), \
                 short_description = COALESCE($5, short_description), \
                 brand = COALESCE($6, brand), \
                 price = COALESCE($7, price), \
                 compare_price = COALESCE($8, compare_price), \
                 stock_quantity = COALESCE($9, stock_quantity), \
                 is_active = COALESCE($10, is_active), \
                 is_featured = COALESCE($11, is_featured), \
                 track_quantity = COALESCE($12, track_quantity), \
                 allow_backorder = COALESCE($13, allow_backorder), \
                 tags = COALESCE($14, tags), \
                 updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(changes.category_id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.short_description)
        .bind(&changes.brand)
        .bind(changes.price)
        .bind(changes.compare_price)
        .bind(changes.stock_quantity)
        .bind(changes.is_active)
        .bind(changes.is_featured)
        .bind(changes.track_quantity)
        .bind(changes.allow_backorder)
        .bind(&changes.tags)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-deactivate a product. Returns `false` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn deactivate(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Push the optional listing filters onto a query ending in a WHERE clause.
fn push_filters<'a>(query: &mut QueryBuilder<'a, Postgres>, filters: &'a ProductFilters) {
    if filters.featured {
        query.push(" AND p.is_featured = TRUE");
    }
    if let Some(slug) = &filters.category_slug {
        query
            .push(" AND c.slug = ")
            .push_bind(slug)
            .push(" AND c.is_active = TRUE");
    }
}
