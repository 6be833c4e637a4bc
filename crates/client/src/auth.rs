//! Auth state mirror.

use crate::api::{ApiClient, ClientError};
use crate::types::UserDto;

/// Client-side mirror of the authenticated session.
///
/// The token itself lives on the [`ApiClient`] so the other mirrors see it;
/// this store tracks the user profile and the login/register lifecycle.
/// Logout is purely local - tokens are revoked only by expiry.
#[derive(Debug, Default)]
pub struct AuthStore {
    user: Option<UserDto>,
    loading: bool,
    error: Option<String>,
}

impl AuthStore {
    /// Create a logged-out store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The authenticated user's profile, if logged in.
    #[must_use]
    pub const fn user(&self) -> Option<&UserDto> {
        self.user.as_ref()
    }

    /// Whether a login/register request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last error message, if the most recent operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether both a token and a profile are present.
    #[must_use]
    pub fn is_authenticated(&self, api: &ApiClient) -> bool {
        api.token().is_some() && self.user.is_some()
    }

    /// Log in; on success the token is installed on the client and the
    /// profile stored here.
    ///
    /// # Errors
    ///
    /// Returns the request error; neither the token nor the profile is
    /// touched on failure.
    pub async fn login(
        &mut self,
        api: &mut ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;

        match api.login(email, password).await {
            Ok(response) => {
                api.set_token(response.token);
                self.user = Some(response.user);
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

    /// Register a new account; on success behaves like a login.
    ///
    /// # Errors
    ///
    /// Returns the request error; neither the token nor the profile is
    /// touched on failure.
    pub async fn register(
        &mut self,
        api: &mut ApiClient,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;

        match api.register(email, password, first_name, last_name).await {
            Ok(response) => {
                api.set_token(response.token);
                self.user = Some(response.user);
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

    /// Log out locally: drop the token and profile. No server call.
    pub fn logout(&mut self, api: &mut ApiClient) {
        api.clear_token();
        self.user = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_logged_out() {
        let api = ApiClient::new("http://127.0.0.1:1");
        let store = AuthStore::new();
        assert!(!store.is_authenticated(&api));
        assert!(store.user().is_none());
    }

    #[test]
    fn test_logout_clears_token_and_user() {
        let mut api = ApiClient::new("http://127.0.0.1:1");
        api.set_token("abc");
        let mut store = AuthStore::new();

        store.logout(&mut api);
        assert!(api.token().is_none());
        assert!(store.user().is_none());
        assert!(!store.is_authenticated(&api));
    }

    #[tokio::test]
    async fn test_failed_login_records_error_and_keeps_logged_out() {
        // Unroutable address: the request itself fails
        let mut api = ApiClient::new("http://127.0.0.1:1");
        let mut store = AuthStore::new();

        let result = store.login(&mut api, "shopper@example.com", "hunter2").await;
        assert!(result.is_err());
        assert!(store.error().is_some());
        assert!(api.token().is_none());
        assert!(store.user().is_none());
    }
}
