//! Admin user management commands.

use unicart_core::Email;
use unicart_server::db::users::UserRepository;
use unicart_server::services::auth::hash_password;

use super::CommandError;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 12;

/// Create an admin user, or promote/reset an existing account.
///
/// # Errors
///
/// Returns an error if the email or password is invalid, or the database
/// write fails.
pub async fn create_user(email: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    if password.len() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(CommandError::InvalidInput(format!(
            "admin password must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(password)?;

    let pool = super::connect().await?;
    let user = UserRepository::new(&pool)
        .upsert_admin(&email, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "admin user ready");
    Ok(())
}
