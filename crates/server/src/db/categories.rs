//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use unicart_core::CategoryId;

use super::RepositoryError;
use crate::models::product::CategoryView;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
    description: Option<String>,
    image: Option<String>,
    icon: Option<String>,
    product_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for CategoryView {
    fn from(r: CategoryRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            slug: r.slug,
            description: r.description,
            image: r.image,
            icon: r.icon,
            product_count: r.product_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Repository for category reads.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active categories ordered by sort key, each with a live count
    /// of its active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<CategoryView>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT c.id, c.name, c.slug, c.description, c.image, c.icon, \
                    c.created_at, c.updated_at, \
                    (SELECT COUNT(*) FROM products p \
                     WHERE p.category_id = c.id AND p.is_active = TRUE) AS product_count \
             FROM categories c \
             WHERE c.is_active = TRUE \
             ORDER BY c.sort_order ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryView::from).collect())
    }
}
