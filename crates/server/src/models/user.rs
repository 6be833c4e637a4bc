//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use unicart_core::{Email, UserId, UserRole};

/// A user account.
///
/// The password hash never appears here; repositories return it separately
/// to the auth service only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub email_verified: bool,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated identity attached to a request by the auth middleware.
///
/// Resolved fresh from storage on every request; holding one proves the
/// bearer token was valid and the account is active.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
}
