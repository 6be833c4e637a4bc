//! Cart state mirror.

use rust_decimal::Decimal;

use unicart_core::{CartSummary, ProductId};

use crate::api::{ApiClient, ClientError};
use crate::types::CartItemDto;

/// Client-side mirror of the server cart.
///
/// Holds the last-fetched authoritative collection. Every mutation
/// re-fetches the whole cart on success; on failure the collection is left
/// untouched and the error is recorded. With no token set, [`refresh`]
/// short-circuits to an empty cart without contacting the server - being
/// logged out is not an error.
///
/// [`refresh`]: CartStore::refresh
#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<CartItemDto>,
    summary: Option<CartSummary>,
    loading: bool,
    error: Option<String>,
}

impl CartStore {
    /// Create an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last-fetched cart lines.
    #[must_use]
    pub fn items(&self) -> &[CartItemDto] {
        &self.items
    }

    /// The last-fetched derived summary, if a fetch has happened.
    #[must_use]
    pub const fn summary(&self) -> Option<&CartSummary> {
        self.summary.as_ref()
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last error message, if the most recent operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn total_items(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of snapshot price x quantity across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum()
    }

    /// Replace the mirror with the server's current cart.
    ///
    /// With no token set, clears to an empty cart without any request.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous collection is discarded only
    /// on success.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        if api.token().is_none() {
            tracing::debug!("no token, clearing cart mirror");
            self.items.clear();
            self.summary = None;
            self.error = None;
            self.loading = false;
            return Ok(());
        }

        self.loading = true;
        self.error = None;

        match api.fetch_cart().await {
            Ok(cart) => {
                self.items = cart.items;
                self.summary = Some(cart.summary);
                self.loading = false;
                Ok(())
            }
            Err(e) => {
                self.loading = false;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Add a quantity of a product, then re-fetch the full cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LoggedOut` without a token; otherwise any
    /// request error, leaving the local collection untouched.
    pub async fn add(
        &mut self,
        api: &ApiClient,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        if api.token().is_none() {
            let e = ClientError::LoggedOut;
            self.error = Some(e.to_string());
            return Err(e);
        }

        if let Err(e) = api.add_to_cart(product_id, quantity).await {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.refresh(api).await
    }

    /// Set a line's quantity, then re-fetch the full cart.
    ///
    /// A quantity of zero or less is forwarded as an explicit remove; the
    /// server itself never converts 0 into a removal.
    ///
    /// # Errors
    ///
    /// Returns any request error, leaving the local collection untouched.
    pub async fn set_quantity(
        &mut self,
        api: &ApiClient,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        if quantity <= 0 {
            return self.remove(api, product_id).await;
        }

        if let Err(e) = api.set_cart_quantity(product_id, quantity).await {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.refresh(api).await
    }

    /// Remove a line, then re-fetch the full cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the line is already gone; a
    /// double-removal surfaces, it is not silently ignored.
    pub async fn remove(
        &mut self,
        api: &ApiClient,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        if let Err(e) = api.remove_from_cart(product_id).await {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.refresh(api).await
    }

    /// Remove every line with repeated single removals.
    ///
    /// Deliberately not a bulk operation: an add racing with this loop can
    /// leave a residual item, which the next refresh surfaces.
    ///
    /// # Errors
    ///
    /// Returns the first removal error; earlier removals stay applied.
    pub async fn clear(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let product_ids: Vec<ProductId> = self.items.iter().map(|i| i.product_id).collect();
        for product_id in product_ids {
            self.remove(api, product_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_without_token_short_circuits_to_empty() {
        // The base URL is unroutable; if a request were made this would fail
        let api = ApiClient::new("http://127.0.0.1:1");
        let mut store = CartStore::new();

        store.refresh(&api).await.expect("logged out is not an error");
        assert!(store.items().is_empty());
        assert!(store.summary().is_none());
        assert!(store.error().is_none());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_add_without_token_errors_without_mutating() {
        let api = ApiClient::new("http://127.0.0.1:1");
        let mut store = CartStore::new();

        let result = store.add(&api, ProductId::generate(), 1).await;
        assert!(matches!(result, Err(ClientError::LoggedOut)));
        assert!(store.items().is_empty());
        assert!(store.error().is_some());
    }

    #[test]
    fn test_totals_on_empty_store() {
        let store = CartStore::new();
        assert_eq!(store.total_items(), 0);
        assert_eq!(store.total_price(), Decimal::ZERO);
    }
}
