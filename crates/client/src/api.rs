//! Typed HTTP client for the UniCart API.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use unicart_core::ProductId;

use crate::types::{AuthResponse, CartResponse, FieldErrorDto, WishlistItemDto};

/// Errors surfaced by the API client and the stores built on it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No token is set; the operation requires authentication.
    #[error("Please login first")]
    LoggedOut,

    /// The server rejected the input with field-level detail.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldErrorDto>,
    },

    /// A business-rule rejection (e.g. insufficient stock).
    #[error("{0}")]
    BadRequest(String),

    /// The token was missing, invalid, or expired server-side.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// The resource is missing or inactive.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate resource (e.g. already in wishlist).
    #[error("{0}")]
    Conflict(String),

    /// The server failed; the message carries no internals.
    #[error("{0}")]
    Server(String),

    /// The request never completed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// A thin typed client over the JSON API.
///
/// Holds the base URL and an optional bearer token. Cloning is cheap; the
/// underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the API at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// The current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Set the bearer token attached to subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Authenticate and return the token plus user profile.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` on bad credentials and
    /// `ClientError::Forbidden` for an inactive account.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        decode(response).await
    }

    /// Register a new account and return the token plus user profile.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Conflict` if the email is taken.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&json!({
                "email": email,
                "password": password,
                "firstName": first_name,
                "lastName": last_name,
            }))
            .send()
            .await?;

        decode(response).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the full cart collection with its summary.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` without a valid token.
    pub async fn fetch_cart(&self) -> Result<CartResponse, ClientError> {
        let response = self
            .authorized(self.http.get(self.url("/cart")))?
            .send()
            .await?;

        decode(response).await
    }

    /// Add a quantity of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for a missing/inactive product and
    /// `ClientError::BadRequest` for insufficient stock.
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        let response = self
            .authorized(self.http.post(self.url("/cart")))?
            .json(&json!({ "productId": product_id, "quantity": quantity }))
            .send()
            .await?;

        expect_success(response).await
    }

    /// Set the quantity of an existing cart item.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the item is not in the cart.
    pub async fn set_cart_quantity(
        &self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        let response = self
            .authorized(self.http.put(self.url(&format!("/cart/{product_id}"))))?
            .json(&json!({ "quantity": quantity }))
            .send()
            .await?;

        expect_success(response).await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the item is not in the cart;
    /// a double-removal is an error to surface, not a no-op.
    pub async fn remove_from_cart(&self, product_id: ProductId) -> Result<(), ClientError> {
        let response = self
            .authorized(self.http.delete(self.url(&format!("/cart/{product_id}"))))?
            .send()
            .await?;

        expect_success(response).await
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Fetch the full wishlist collection.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` without a valid token.
    pub async fn fetch_wishlist(&self) -> Result<Vec<WishlistItemDto>, ClientError> {
        #[derive(serde::Deserialize)]
        struct WishlistResponse {
            items: Vec<WishlistItemDto>,
        }

        let response = self
            .authorized(self.http.get(self.url("/wishlist")))?
            .send()
            .await?;

        let body: WishlistResponse = decode(response).await?;
        Ok(body.items)
    }

    /// Add a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Conflict` if the product is already saved.
    pub async fn add_to_wishlist(&self, product_id: ProductId) -> Result<(), ClientError> {
        let response = self
            .authorized(self.http.post(self.url("/wishlist")))?
            .json(&json!({ "productId": product_id }))
            .send()
            .await?;

        expect_success(response).await
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the item is not saved.
    pub async fn remove_from_wishlist(&self, product_id: ProductId) -> Result<(), ClientError> {
        let response = self
            .authorized(
                self.http
                    .delete(self.url(&format!("/wishlist/{product_id}"))),
            )?
            .send()
            .await?;

        expect_success(response).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the bearer token, or fail fast when none is set.
    fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::LoggedOut)?;
        Ok(builder.bearer_auth(token))
    }
}

/// Decode a success body, or map an error status to a typed error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Consume a mutation response, keeping only success/failure.
async fn expect_success(response: Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    Ok(())
}

/// Map a non-success response to a typed error using the server's
/// `{error, details?}` body.
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or_default();
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_owned();

    match status {
        StatusCode::BAD_REQUEST => {
            let details: Vec<FieldErrorDto> = body
                .get("details")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default();
            if details.is_empty() {
                ClientError::BadRequest(message)
            } else {
                ClientError::Validation { message, details }
            }
        }
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        _ => ClientError::Server(message),
    }
}
