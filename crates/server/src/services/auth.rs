//! Authentication service.
//!
//! Issues and validates bearer credentials (JWT) and manages password
//! registration/login. Passwords are hashed with Argon2id; the token carries
//! the user id and role so protected handlers never hit the store just to
//! authenticate.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hearth_core::{Email, Role, UserId};

use crate::error::{AppError, Result};
use crate::models::User;
use crate::store::{DocumentStore, StoreError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors raised by authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// The email failed structural validation.
    #[error(transparent)]
    InvalidEmail(#[from] hearth_core::EmailError),

    /// The password does not meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Token encoding/decoding failed.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failed.
    #[error("hash error: {0}")]
    Hash(String),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub sub: UserId,
    /// Role at issuance time.
    pub role: Role,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn DocumentStore,
    secret: &'a [u8],
    token_ttl_hours: i64,
}

/// A freshly issued credential plus the profile it belongs to.
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, secret: &'a [u8], token_ttl_hours: i64) -> Self {
        Self {
            store,
            secret,
            token_ttl_hours,
        }
    }

    /// Register a new user and issue a credential.
    ///
    /// Admin accounts cannot be self-registered; they are provisioned via
    /// the CLI. A missing role defaults to plain `user`.
    ///
    /// # Errors
    ///
    /// `Validation` for an admin role request, `Auth` for invalid email,
    /// weak password or a taken email.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        phone: Option<String>,
        password: &str,
        role: Option<Role>,
    ) -> Result<Session> {
        let email = Email::parse(email).map_err(AuthError::from)?;
        validate_password(password)?;

        let role = match role {
            Some(Role::Admin) => {
                return Err(AppError::Validation(
                    "admin accounts are provisioned via the CLI".to_owned(),
                ));
            }
            Some(other) => other,
            None => Role::User,
        };

        if name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_owned()));
        }

        let password_hash = hash_password(password)?;

        let user = User {
            id: UserId::generate(),
            name: name.trim().to_owned(),
            email,
            phone,
            password_hash,
            role,
            created_at: Utc::now(),
        };

        let user = self.store.insert_user(user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Auth(AuthError::EmailTaken),
            other => AppError::Store(other),
        })?;

        let token = self.issue_token(&user)?;
        Ok(Session { token, user })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// `Auth(InvalidCredentials)` when the email is unknown or the password
    /// does not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let user = self
            .store
            .user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let token = self.issue_token(&user)?;
        Ok(Session { token, user })
    }

    /// Resolve the authenticated user's full profile.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account behind the credential has been removed.
    pub async fn current_user(&self, id: UserId) -> Result<User> {
        self.store
            .user(id)
            .await?
            .ok_or(AppError::NotFound("user"))
    }

    /// Sign a bearer token for `user`.
    fn issue_token(&self, user: &User) -> Result<String> {
        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: (Utc::now() + Duration::hours(self.token_ttl_hours)).timestamp(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret),
        )
        .map_err(AuthError::from)?;

        Ok(token)
    }
}

/// Decode and validate a bearer token, returning its claims.
///
/// # Errors
///
/// Returns `AuthError::Token` for malformed, mis-signed or expired tokens.
pub fn decode_token(secret: &[u8], token: &str) -> std::result::Result<Claims, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

fn validate_password(password: &str) -> std::result::Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh salt.
///
/// # Errors
///
/// `AuthError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> std::result::Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> std::result::Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const SECRET: &[u8] = b"test-signing-key-of-sufficient-length";

    fn service(store: &MemoryStore) -> AuthService<'_> {
        AuthService::new(store, SECRET, 1)
    }

    #[tokio::test]
    async fn register_then_login_round_trips() {
        let store = MemoryStore::new();
        let auth = service(&store);

        let session = auth
            .register("Greta Agent", "greta@example.com", None, "hunter2hunter2", Some(Role::Agent))
            .await
            .expect("register");
        assert_eq!(session.user.role, Role::Agent);

        let session = auth
            .login("greta@example.com", "hunter2hunter2")
            .await
            .expect("login");
        let claims = decode_token(SECRET, &session.token).expect("decode");
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.role, Role::Agent);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let store = MemoryStore::new();
        let auth = service(&store);
        auth.register("A", "a@example.com", None, "correct-horse", None)
            .await
            .expect("register");

        let err = auth.login("a@example.com", "battery-staple").await;
        assert!(matches!(
            err,
            Err(AppError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        let auth = service(&store);
        auth.register("A", "dup@example.com", None, "longenough", None)
            .await
            .expect("register");

        let err = auth
            .register("B", "dup@example.com", None, "longenough", None)
            .await;
        assert!(matches!(err, Err(AppError::Auth(AuthError::EmailTaken))));
    }

    #[tokio::test]
    async fn admin_self_registration_is_refused() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let err = auth
            .register("Eve", "eve@example.com", None, "longenough", Some(Role::Admin))
            .await;
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn short_passwords_are_weak() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let err = auth.register("A", "a@example.com", None, "short", None).await;
        assert!(matches!(
            err,
            Err(AppError::Auth(AuthError::WeakPassword(_)))
        ));
    }

    #[test]
    fn garbage_tokens_do_not_decode() {
        assert!(decode_token(SECRET, "not-a-token").is_err());
    }
}
