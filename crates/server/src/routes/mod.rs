//! HTTP route handlers for the JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Auth
//! POST /auth/login                 - Authenticate, returns token + user
//! POST /auth/register              - Create account, returns token + user
//!
//! # Catalog
//! GET  /products                   - Product listing (featured/category/page/limit)
//! GET  /products/{id}              - Product detail
//! GET  /categories                 - Active categories with product counts
//!
//! # Cart (requires bearer token)
//! GET    /cart                     - All items + derived summary
//! POST   /cart                     - Add item (increments existing row)
//! PUT    /cart/{productId}         - Set quantity
//! DELETE /cart/{productId}         - Remove item
//!
//! # Wishlist (requires bearer token)
//! GET    /wishlist                 - All items
//! POST   /wishlist                 - Add item (409 on duplicate)
//! DELETE /wishlist/{productId}     - Remove item
//!
//! # Admin (requires admin role)
//! POST   /admin/products           - Create product
//! PUT    /admin/products/{id}      - Update product
//! DELETE /admin/products/{id}      - Soft-deactivate product
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::index).post(cart::add))
        .route(
            "/{productId}",
            put(cart::update).delete(cart::remove),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index).post(wishlist::add))
        .route("/{productId}", delete(wishlist::remove))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .route("/categories", get(categories::index))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/admin", admin_routes())
}
