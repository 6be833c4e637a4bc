//! Database seed command.
//!
//! Seeds the catalog with the standard categories and a handful of sample
//! products, and bootstraps the admin account. Idempotent: existing rows
//! (matched by slug/sku/email) are left alone.
//!
//! # Environment Variables
//!
//! - `ADMIN_EMAIL` - Bootstrap admin email (default: admin@example.com)
//! - `ADMIN_PASSWORD` - Bootstrap admin password (required; there is no
//!   insecure default)

use rust_decimal::Decimal;
use sqlx::PgPool;

use unicart_core::{CategoryId, Email, ProductId};
use unicart_server::db::users::UserRepository;
use unicart_server::services::auth::hash_password;

use super::CommandError;

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    icon: &'static str,
    sort_order: i32,
}

struct SeedProduct {
    category_slug: &'static str,
    name: &'static str,
    slug: &'static str,
    sku: &'static str,
    brand: &'static str,
    description: &'static str,
    short_description: &'static str,
    price_cents: i64,
    compare_price_cents: Option<i64>,
    stock_quantity: i32,
    is_featured: bool,
    tags: &'static [&'static str],
    image_url: &'static str,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Electronics",
        slug: "electronics",
        description: "Latest electronics and gadgets",
        icon: "📱",
        sort_order: 1,
    },
    SeedCategory {
        name: "Fashion",
        slug: "fashion",
        description: "Trendy fashion and clothing",
        icon: "👕",
        sort_order: 2,
    },
    SeedCategory {
        name: "Home & Garden",
        slug: "home-garden",
        description: "Home improvement and garden supplies",
        icon: "🏠",
        sort_order: 3,
    },
    SeedCategory {
        name: "Sports",
        slug: "sports",
        description: "Sports equipment and accessories",
        icon: "⚽",
        sort_order: 4,
    },
    SeedCategory {
        name: "Books",
        slug: "books",
        description: "Books and reading materials",
        icon: "📚",
        sort_order: 5,
    },
    SeedCategory {
        name: "Beauty",
        slug: "beauty",
        description: "Beauty and personal care products",
        icon: "💄",
        sort_order: 6,
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        category_slug: "electronics",
        name: "Wireless Headphones Pro",
        slug: "wireless-headphones-pro",
        sku: "AUD-001",
        brand: "AudioTech",
        description: "Premium wireless headphones with noise cancellation and long battery \
            life. Perfect for music lovers and professionals.",
        short_description: "Premium wireless headphones with noise cancellation",
        price_cents: 9999,
        compare_price_cents: Some(14999),
        stock_quantity: 50,
        is_featured: true,
        tags: &["wireless", "headphones", "audio"],
        image_url: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&h=800&fit=crop",
    },
    SeedProduct {
        category_slug: "electronics",
        name: "Smart Watch Pro",
        slug: "smart-watch-pro",
        sku: "TECH-002",
        brand: "TechWear",
        description: "Advanced smartwatch with fitness tracking, heart rate monitor, and \
            smartphone connectivity. Stay connected on the go.",
        short_description: "Advanced smartwatch with fitness tracking",
        price_cents: 24999,
        compare_price_cents: Some(29999),
        stock_quantity: 30,
        is_featured: true,
        tags: &["smartwatch", "fitness", "wearable"],
        image_url: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800&h=800&fit=crop",
    },
    SeedProduct {
        category_slug: "sports",
        name: "Yoga Mat Premium",
        slug: "yoga-mat-premium",
        sku: "FIT-003",
        brand: "FitLife",
        description: "High-quality yoga mat with non-slip surface and extra cushioning. \
            Perfect for yoga, pilates, and fitness routines.",
        short_description: "High-quality yoga mat with non-slip surface",
        price_cents: 3499,
        compare_price_cents: Some(4499),
        stock_quantity: 75,
        is_featured: true,
        tags: &["yoga", "fitness", "exercise"],
        image_url: "https://images.unsplash.com/photo-1601925260368-ae2f83cf8b7f?w=800&h=800&fit=crop",
    },
];

/// Seed categories, sample products, and the bootstrap admin account.
///
/// # Errors
///
/// Returns an error if `ADMIN_PASSWORD` is unset or a database write fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    seed_admin(&pool).await?;

    for category in CATEGORIES {
        let id = ensure_category(&pool, category).await?;
        tracing::info!(slug = category.slug, %id, "category ready");
    }

    for product in PRODUCTS {
        let id = ensure_product(&pool, product).await?;
        tracing::info!(slug = product.slug, %id, "product ready");
    }

    tracing::info!("Seed complete!");
    Ok(())
}

async fn seed_admin(pool: &PgPool) -> Result<(), CommandError> {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password =
        std::env::var("ADMIN_PASSWORD").map_err(|_| CommandError::MissingEnvVar("ADMIN_PASSWORD"))?;

    let email = Email::parse(&email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let password_hash = hash_password(&password)?;

    let admin = UserRepository::new(pool)
        .upsert_admin(&email, &password_hash)
        .await?;
    tracing::info!(email = %admin.email, "admin account ready");
    Ok(())
}

/// Insert a category if its slug is new; return its ID either way.
async fn ensure_category(
    pool: &PgPool,
    category: &SeedCategory,
) -> Result<CategoryId, CommandError> {
    let inserted = sqlx::query_scalar::<_, CategoryId>(
        "INSERT INTO categories (name, slug, description, icon, sort_order) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (slug) DO NOTHING \
         RETURNING id",
    )
    .bind(category.name)
    .bind(category.slug)
    .bind(category.description)
    .bind(category.icon)
    .bind(category.sort_order)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = inserted {
        return Ok(id);
    }

    let id = sqlx::query_scalar::<_, CategoryId>("SELECT id FROM categories WHERE slug = $1")
        .bind(category.slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

/// Insert a product (with its primary image) if its slug is new; return its
/// ID either way.
async fn ensure_product(pool: &PgPool, product: &SeedProduct) -> Result<ProductId, CommandError> {
    let category_id =
        sqlx::query_scalar::<_, CategoryId>("SELECT id FROM categories WHERE slug = $1")
            .bind(product.category_slug)
            .fetch_one(pool)
            .await?;

    let tags: Vec<String> = product.tags.iter().map(ToString::to_string).collect();

    let inserted = sqlx::query_scalar::<_, ProductId>(
        "INSERT INTO products (category_id, name, slug, sku, brand, description, \
             short_description, price, compare_price, stock_quantity, is_featured, tags) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (slug) DO NOTHING \
         RETURNING id",
    )
    .bind(category_id)
    .bind(product.name)
    .bind(product.slug)
    .bind(product.sku)
    .bind(product.brand)
    .bind(product.description)
    .bind(product.short_description)
    .bind(Decimal::new(product.price_cents, 2))
    .bind(product.compare_price_cents.map(|c| Decimal::new(c, 2)))
    .bind(product.stock_quantity)
    .bind(product.is_featured)
    .bind(&tags)
    .fetch_optional(pool)
    .await?;

    let Some(id) = inserted else {
        let id = sqlx::query_scalar::<_, ProductId>("SELECT id FROM products WHERE slug = $1")
            .bind(product.slug)
            .fetch_one(pool)
            .await?;
        return Ok(id);
    };

    sqlx::query(
        "INSERT INTO product_images (product_id, url, alt, sort_order, is_primary) \
         VALUES ($1, $2, $3, 0, TRUE)",
    )
    .bind(id)
    .bind(product.image_url)
    .bind(product.name)
    .execute(pool)
    .await?;

    Ok(id)
}
