//! Authentication service.
//!
//! Provides password sign-in and remember-token sessions.
//!
//! A remember token is a random URL-safe string handed to the client's
//! session; the `users` table only holds its SHA-256 digest, so a leaked row
//! cannot be replayed as a session.

mod error;

pub use error::{AuthError, PasswordHashError};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use sample_app_core::{Email, UserId};

use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
///
/// Handles sign-in, sign-out and resolving a session's remember token.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Find the user registered under `email` and check `password`.
    ///
    /// Returns `None` for an unknown or malformed email as well as for a
    /// wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };

        let user = self.users.get_by_email(&email).await?;

        Ok(user.filter(|u| u.authenticate(password).is_some()))
    }

    /// Sign in with email and password.
    ///
    /// Issues a fresh remember token, stores its digest and returns the raw
    /// token for the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let mut user = self
            .authenticate(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.remember(user.id).await?;
        user.remember_token = digest_token(&token);

        tracing::info!(user_id = %user.id, "user signed in");

        Ok((user, token))
    }

    /// Issue a fresh remember token for `user_id` and store its digest.
    ///
    /// Returns the raw token for the session. Any previously issued token
    /// stops working.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn remember(&self, user_id: UserId) -> Result<String, AuthError> {
        let token = new_remember_token();
        self.users
            .update_remember_token(user_id, &digest_token(&token))
            .await?;
        Ok(token)
    }

    /// Sign out by rotating the stored remember token digest, which
    /// invalidates every session still holding the old token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn sign_out(&self, user_id: UserId) -> Result<(), AuthError> {
        let digest = digest_token(&new_remember_token());
        self.users.update_remember_token(user_id, &digest).await?;

        tracing::info!(user_id = %user_id, "user signed out");

        Ok(())
    }

    /// Resolve the user holding raw remember `token`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn user_for_remember_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }

        let user = self.users.get_by_remember_token(&digest_token(token)).await?;
        Ok(user)
    }
}

/// A new random remember token (128 bits, URL-safe base64).
#[must_use]
pub fn new_remember_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest of a remember token, URL-safe base64 encoded.
#[must_use]
pub fn digest_token(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `PasswordHashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordHashError)
}

/// Verify a password against a stored hash.
///
/// An unparseable hash never verifies.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
