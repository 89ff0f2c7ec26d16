//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sample_app_core::{Email, UserId, UserName, ValidationErrors};

use crate::services::auth::verify_password;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A site user (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: UserName,
    /// Email address, always lower-case.
    pub email: Email,
    /// Argon2 PHC string of the password. The password itself is never stored.
    pub password_digest: String,
    /// Digest of the user's current remember token.
    pub remember_token: String,
    /// Whether the user may administer other users.
    pub admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns `Some(self)` if `password` matches the stored digest.
    #[must_use]
    pub fn authenticate(&self, password: &str) -> Option<&Self> {
        verify_password(password, &self.password_digest).then_some(self)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.admin
    }

    /// Flip the admin flag on this in-memory record.
    ///
    /// Persist with `UserService::set_admin`.
    pub const fn toggle_admin(&mut self) {
        self.admin = !self.admin;
    }
}

/// Public view of a user, safe to serialize in responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: UserName,
    pub email: Email,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            admin: user.admin,
            created_at: user.created_at,
        }
    }
}

/// Attributes submitted to create or update a user.
///
/// Nothing is checked until [`UserForm::validate`] runs. Missing fields
/// deserialize as empty strings and fail validation like blank ones.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl std::fmt::Debug for UserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .finish()
    }
}

impl UserForm {
    /// Build a form whose password and confirmation are the same.
    #[must_use]
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            password_confirmation: password.to_owned(),
        }
    }

    /// Run the field rules: name, email format, password presence, length
    /// and confirmation.
    ///
    /// Email uniqueness needs the database and is checked by
    /// `UserService::validate`.
    ///
    /// # Errors
    ///
    /// Returns every failed rule, keyed by attribute.
    pub fn validate(&self) -> Result<ValidatedUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = UserName::parse(&self.name)
            .map_err(|e| errors.add("name", e.to_string()))
            .ok();
        let email = Email::parse(&self.email)
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();

        if self.password.trim().is_empty() {
            errors.add("password", "can't be blank");
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("is too short (minimum is {MIN_PASSWORD_LENGTH} characters)"),
            );
        }

        if self.password_confirmation != self.password {
            errors.add("password_confirmation", "doesn't match Password");
        }

        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => Ok(ValidatedUser {
                name,
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }

    /// Whether the field rules pass.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A user form whose field rules passed.
#[derive(Clone)]
pub struct ValidatedUser {
    pub name: UserName,
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for ValidatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
