//! Authentication service.
//!
//! Password hashing (Argon2id) and signed session tokens (HS256 JWT).
//! Tokens are stateless: there is no server-side session or revocation
//! list, so a token stays valid until its expiry.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use unicart_core::{Email, UserId, UserRole};

use crate::config::ServerConfig;
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Claims carried in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (UUID string form).
    pub sub: String,
    /// User's email at issue time.
    pub email: String,
    /// User's role at issue time.
    pub role: UserRole,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a typed user ID.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }
}

/// Prepared JWT signing/verification keys.
///
/// Built once at startup from validated configuration; a placeholder or
/// default secret never reaches this type because config loading rejects it.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_days: i64,
}

impl TokenKeys {
    /// Derive token keys from server configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_days: config.token_ttl_days,
        }
    }

    /// Issue a signed token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue(&self, user_id: UserId, email: &Email, role: UserRole) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.as_str().to_owned(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(self.ttl_days)).timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token's signature and expiry.
    ///
    /// Every failure mode (malformed, expired, bad signature) collapses to
    /// `None`; callers cannot distinguish them and neither can clients.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

/// Authentication service.
///
/// Handles user registration and login against the `users` table.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenKeys) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user with email and password.
    ///
    /// The email is lowercased by `Email::parse`; the new account gets the
    /// `CUSTOMER` role. Returns the created user and a fresh session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, &password_hash, first_name, last_name)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue(user.id, &user.email, user.role)?;
        Ok((user, token))
    }

    /// Login with email and password.
    ///
    /// An unknown email and a wrong password are indistinguishable; a
    /// deactivated account is a distinct outcome. Updates `last_login` on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountInactive` if the account is deactivated.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_auth_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        if !verify_password(password, &password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        self.users.touch_last_login(user.id).await?;

        let token = self.tokens.issue(user.id, &user.email, user.role)?;
        Ok((user, token))
    }
}

/// Hash a password using Argon2id with a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// Returns `false` for a wrong password and for a malformed hash alike;
/// this function never fails.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_keys() -> TokenKeys {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            jwt_secret: SecretString::from("kX9#mP2$vL8@qR5!wN3^tB7&zC4*hF6%"),
            token_ttl_days: 7,
        };
        TokenKeys::from_config(&config)
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_malformed_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_token_roundtrip() {
        let keys = test_keys();
        let user_id = UserId::generate();
        let email = Email::parse("shopper@example.com").unwrap();

        let token = keys.issue(user_id, &email, UserRole::Customer).unwrap();
        let claims = keys.verify(&token).expect("token should verify");

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.email, "shopper@example.com");
        assert_eq!(claims.role, UserRole::Customer);
    }

    #[test]
    fn test_verify_garbage_token_is_none() {
        let keys = test_keys();
        assert!(keys.verify("not.a.token").is_none());
        assert!(keys.verify("").is_none());
    }

    #[test]
    fn test_verify_with_wrong_key_is_none() {
        let keys = test_keys();
        let user_id = UserId::generate();
        let email = Email::parse("shopper@example.com").unwrap();
        let token = keys.issue(user_id, &email, UserRole::Admin).unwrap();

        let other = TokenKeys {
            encoding: EncodingKey::from_secret(b"a-completely-different-signing-key!"),
            decoding: DecodingKey::from_secret(b"a-completely-different-signing-key!"),
            ttl_days: 7,
        };
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_expired_token_is_none() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            jwt_secret: SecretString::from("kX9#mP2$vL8@qR5!wN3^tB7&zC4*hF6%"),
            token_ttl_days: -1,
        };
        let keys = TokenKeys::from_config(&config);
        let token = keys
            .issue(
                UserId::generate(),
                &Email::parse("shopper@example.com").unwrap(),
                UserRole::Customer,
            )
            .unwrap();
        assert!(keys.verify(&token).is_none());
    }
}
