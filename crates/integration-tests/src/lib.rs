//! Integration tests for UniCart.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations + seed
//! cargo run -p unicart-cli -- migrate
//! cargo run -p unicart-cli -- seed
//!
//! # Start the server
//! cargo run -p unicart-server
//!
//! # Run integration tests
//! cargo test -p unicart-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `UNICART_BASE_URL` - Server base URL (default: `http://localhost:3000`)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Credentials of the seeded admin,
//!   for the tests that exercise the admin surface

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Shared context for driving the API in tests.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a context pointing at the configured server.
    #[must_use]
    pub fn new() -> Self {
        let base_url =
            std::env::var("UNICART_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// A unique throwaway email for this test run.
    #[must_use]
    pub fn unique_email(prefix: &str) -> String {
        format!("{prefix}-{}@example.com", Uuid::new_v4())
    }

    /// Register a fresh customer and return `(token, user)`.
    ///
    /// # Panics
    ///
    /// Panics if registration does not return 201 with a token.
    pub async fn register_customer(&self, email: &str, password: &str) -> (String, Value) {
        let resp = self
            .client
            .post(format!("{}/auth/register", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed");

        assert_eq!(resp.status(), 201, "registration should return 201");
        let body: Value = resp.json().await.expect("register body should be JSON");
        let token = body["token"].as_str().expect("token present").to_string();
        (token, body["user"].clone())
    }

    /// Log in with existing credentials and return `(token, user)`.
    ///
    /// # Panics
    ///
    /// Panics if login does not return 200 with a token.
    pub async fn login(&self, email: &str, password: &str) -> (String, Value) {
        let resp = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");

        assert_eq!(resp.status(), 200, "login should return 200");
        let body: Value = resp.json().await.expect("login body should be JSON");
        let token = body["token"].as_str().expect("token present").to_string();
        (token, body["user"].clone())
    }

    /// Log in as the seeded admin (`ADMIN_EMAIL`/`ADMIN_PASSWORD`).
    ///
    /// # Panics
    ///
    /// Panics if the admin credentials are unset or rejected.
    pub async fn admin_token(&self) -> String {
        let email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let password = std::env::var("ADMIN_PASSWORD")
            .expect("ADMIN_PASSWORD must be set for admin-surface tests");
        let (token, _) = self.login(&email, &password).await;
        token
    }

    /// Any product ID from the seeded catalog.
    ///
    /// # Panics
    ///
    /// Panics if the catalog is empty.
    pub async fn any_product_id(&self) -> String {
        let resp = self
            .client
            .get(format!("{}/products", self.base_url))
            .send()
            .await
            .expect("products request failed");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("products body should be JSON");
        body["products"][0]["id"]
            .as_str()
            .expect("seeded catalog should have at least one product")
            .to_string()
    }

    /// Create a product through the admin surface and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if creation does not return 201.
    pub async fn create_product(&self, admin_token: &str, price: &str, stock: i64) -> String {
        let suffix = Uuid::new_v4();
        let resp = self
            .client
            .post(format!("{}/admin/products", self.base_url))
            .bearer_auth(admin_token)
            .json(&json!({
                "categoryId": self.any_category_id().await,
                "name": format!("Test Product {suffix}"),
                "slug": format!("test-product-{suffix}"),
                "sku": format!("TEST-{suffix}"),
                "price": price,
                "stockQuantity": stock,
            }))
            .send()
            .await
            .expect("create product request failed");

        assert_eq!(resp.status(), 201, "product creation should return 201");
        let body: Value = resp.json().await.expect("product body should be JSON");
        body["product"]["id"]
            .as_str()
            .expect("created product id")
            .to_string()
    }

    /// Any category ID from the seeded catalog.
    ///
    /// # Panics
    ///
    /// Panics if there are no categories.
    pub async fn any_category_id(&self) -> String {
        let resp = self
            .client
            .get(format!("{}/categories", self.base_url))
            .send()
            .await
            .expect("categories request failed");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("categories body should be JSON");
        body["categories"][0]["id"]
            .as_str()
            .expect("seeded catalog should have at least one category")
            .to_string()
    }
}
