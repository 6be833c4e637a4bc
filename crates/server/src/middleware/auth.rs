//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring bearer-token authentication in route
//! handlers. The gate is stateless and re-evaluated on every request:
//! extract the token, verify signature and expiry, then resolve the claims
//! against current storage so a deactivated account is locked out
//! immediately even while its tokens are unexpired.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::user::CurrentUser;
use crate::state::AppState;

/// Extractor that requires a valid bearer token resolving to an active user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        Ok(Self(user))
    }
}

/// Extractor that additionally requires the administrative role.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Authorization("Admin access required".to_owned()));
        }

        Ok(Self(user))
    }
}

/// Run the full gate: token present, token valid, user active.
async fn authenticate(parts: &Parts, state: &AppState) -> Result<CurrentUser, AppError> {
    let token = bearer_token(parts)
        .ok_or_else(|| AppError::Authentication("Authentication required".to_owned()))?;

    // Malformed, expired, and bad-signature tokens are deliberately
    // indistinguishable here and to the client.
    let claims = state
        .tokens()
        .verify(token)
        .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_owned()))?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_owned()))?;

    let user = UserRepository::new(state.pool()).get_by_id(user_id).await?;

    match user {
        Some(user) if user.is_active => Ok(CurrentUser {
            id: user.id,
            email: user.email,
            role: user.role,
        }),
        _ => Err(AppError::Authentication(
            "User not found or inactive".to_owned(),
        )),
    }
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
