//! Unified error handling for the API boundary.
//!
//! Provides a unified `AppError` type mapping every failure to the HTTP
//! taxonomy: validation 400, authentication 401, authorization 403,
//! not-found 404, conflict 409, business-rule 400, internal 500. All route
//! handlers return `Result<T, AppError>`. Storage and internal failures are
//! logged with full context here and collapsed to an opaque message before
//! reaching the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input, with field-level detail.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Request is not authenticated.
    #[error("authentication: {0}")]
    Authentication(String),

    /// Authenticated but not allowed.
    #[error("authorization: {0}")]
    Authorization(String),

    /// Resource missing or inactive.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate resource.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Business-rule rejection (e.g. insufficient stock).
    #[error("business rule: {0}")]
    BusinessRule(String),

    /// Authentication service failure.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BusinessRule(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::AccountInactive => StatusCode::FORBIDDEN,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-visible message. Internal details are withheld.
    fn client_message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::AccountInactive => "Account is inactive".to_string(),
                AuthError::EmailTaken => "Email already registered".to_string(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Authentication(msg)
            | Self::Authorization(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::BusinessRule(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server-side failures with full context before collapsing them
        if matches!(self, Self::Database(_) | Self::Internal(_))
            || matches!(
                self,
                Self::Auth(
                    AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_)
                )
            )
        {
            tracing::error!(error = %self, "Request error");
        }

        let status = self.status();
        let body = match &self {
            Self::Validation(details) => json!({
                "error": self.client_message(),
                "details": details,
            }),
            _ => json!({ "error": self.client_message() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        Self::Validation(details)
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Validation(vec![])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Authentication("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Authorization("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::BusinessRule("Insufficient stock".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_withheld() {
        let err = AppError::Internal("connection refused at 10.0.0.3:5432".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::AccountInactive)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::EmailTaken)),
            StatusCode::CONFLICT
        );
    }
}
