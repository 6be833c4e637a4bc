//! Wishlist state mirror.

use unicart_core::ProductId;

use crate::api::{ApiClient, ClientError};
use crate::types::WishlistItemDto;

/// Client-side mirror of the server wishlist.
///
/// Same contract as the cart mirror: refetch-after-mutation, errors leave
/// the collection untouched, and no token means an empty collection without
/// a request.
#[derive(Debug, Default)]
pub struct WishlistStore {
    items: Vec<WishlistItemDto>,
    loading: bool,
    error: Option<String>,
}

impl WishlistStore {
    /// Create an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last-fetched wishlist entries.
    #[must_use]
    pub fn items(&self) -> &[WishlistItemDto] {
        &self.items
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

    /// Whether a product is in the mirrored wishlist.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Replace the mirror with the server's current wishlist.
    ///
    /// With no token set, clears to empty without any request.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous collection is discarded only
    /// on success.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        if api.token().is_none() {
            tracing::debug!("no token, clearing wishlist mirror");
            self.items.clear();
            self.error = None;
            self.loading = false;
            return Ok(());
        }

        self.loading = true;
        self.error = None;

        match api.fetch_wishlist().await {
            Ok(items) => {
                self.items = items;
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

    /// Add a product, then re-fetch the full wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Conflict` if the product is already saved -
    /// the server never upserts - and leaves the collection untouched.
    pub async fn add(&mut self, api: &ApiClient, product_id: ProductId) -> Result<(), ClientError> {
        if api.token().is_none() {
            let e = ClientError::LoggedOut;
            self.error = Some(e.to_string());
            return Err(e);
        }

        if let Err(e) = api.add_to_wishlist(product_id).await {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.refresh(api).await
    }

    /// Remove a product, then re-fetch the full wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the entry is already gone.
    pub async fn remove(
        &mut self,
        api: &ApiClient,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        if let Err(e) = api.remove_from_wishlist(product_id).await {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.refresh(api).await
    }

    /// Remove every entry with repeated single removals.
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
