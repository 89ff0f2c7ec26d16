//! User account service.
//!
//! Owns the full validation of a user (field rules plus case-insensitive
//! email uniqueness) and every write to the `users` table.

use sqlx::PgPool;
use thiserror::Error;

use sample_app_core::{Email, UserId, ValidationErrors};

use super::auth::{PasswordHashError, digest_token, hash_password, new_remember_token};
use crate::db::microposts::MicropostRepository;
use crate::db::users::{NewUser, UserChanges, UserRepository};
use crate::db::{Page, RepositoryError};
use crate::models::micropost::Micropost;
use crate::models::user::{User, UserForm, ValidatedUser};

/// Message recorded on `email` when the address is already registered.
const EMAIL_TAKEN: &str = "has already been taken";

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// The submitted attributes failed validation; nothing was written.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// User not found.
    #[error("user not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

impl From<PasswordHashError> for UserError {
    fn from(_: PasswordHashError) -> Self {
        Self::PasswordHash
    }
}

fn email_taken_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add("email", EMAIL_TAKEN);
    errors
}

/// Translate a unique-index race into the same error a pre-check would give.
fn conflict_to_invalid(err: RepositoryError) -> UserError {
    match err {
        RepositoryError::Conflict(_) => UserError::Invalid(email_taken_errors()),
        RepositoryError::NotFound => UserError::NotFound,
        other => UserError::Repository(other),
    }
}

/// User account service.
pub struct UserService<'a> {
    users: UserRepository<'a>,
    microposts: MicropostRepository<'a>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            microposts: MicropostRepository::new(pool),
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Run every rule for `form`, including email uniqueness.
    ///
    /// `existing` is the user being updated, whose own row does not count as
    /// a collision.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Invalid` with all failed rules.
    /// Returns `UserError::Repository` if the uniqueness query fails.
    pub async fn validate(
        &self,
        form: &UserForm,
        existing: Option<UserId>,
    ) -> Result<ValidatedUser, UserError> {
        let mut errors = ValidationErrors::new();

        let validated = match form.validate() {
            Ok(validated) => Some(validated),
            Err(field_errors) => {
                errors.merge(field_errors);
                None
            }
        };

        // Uniqueness only means something for a well-formed address.
        if let Ok(email) = Email::parse(&form.email)
            && self.users.email_taken(&email, existing).await?
        {
            errors.merge(email_taken_errors());
        }

        match validated {
            Some(validated) if errors.is_empty() => Ok(validated),
            _ => Err(UserError::Invalid(errors)),
        }
    }

    /// Whether `form` would be accepted by [`UserService::register`].
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` if the uniqueness query fails.
    pub async fn is_valid(&self, form: &UserForm) -> Result<bool, UserError> {
        match self.validate(form, None).await {
            Ok(_) => Ok(true),
            Err(UserError::Invalid(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Validate and save a new user.
    ///
    /// The password is stored only as its Argon2 digest and a remember token
    /// is generated.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Invalid` if validation fails (nothing is saved).
    /// Returns `UserError::Repository` for database errors.
    pub async fn register(&self, form: &UserForm) -> Result<User, UserError> {
        let validated = self.validate(form, None).await?;
        let password_digest = hash_password(&validated.password)?;
        let remember_token = digest_token(&new_remember_token());

        let user = self
            .users
            .create(&NewUser {
                name: &validated.name,
                email: &validated.email,
                password_digest: &password_digest,
                remember_token: &remember_token,
            })
            .await
            .map_err(conflict_to_invalid)?;

        tracing::info!(user_id = %user.id, email = %user.email, "user registered");

        Ok(user)
    }

    /// Validate and apply a full profile update.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Invalid` if validation fails (nothing is saved).
    /// Returns `UserError::NotFound` if the user doesn't exist.
    /// Returns `UserError::Repository` for database errors.
    pub async fn update(&self, id: UserId, form: &UserForm) -> Result<User, UserError> {
        let validated = self.validate(form, Some(id)).await?;
        let password_digest = hash_password(&validated.password)?;

        let user = self
            .users
            .update(
                id,
                &UserChanges {
                    name: &validated.name,
                    email: &validated.email,
                    password_digest: &password_digest,
                },
            )
            .await
            .map_err(conflict_to_invalid)?;

        tracing::info!(user_id = %user.id, "user updated");

        Ok(user)
    }

    /// Persist the admin flag.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user doesn't exist.
    /// Returns `UserError::Repository` for database errors.
    pub async fn set_admin(&self, id: UserId, admin: bool) -> Result<(), UserError> {
        self.users
            .set_admin(id, admin)
            .await
            .map_err(conflict_to_invalid)?;

        tracing::info!(user_id = %id, admin, "admin flag changed");

        Ok(())
    }

    /// Delete a user and all of their microposts.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user doesn't exist.
    /// Returns `UserError::Repository` for database errors.
    pub async fn destroy(&self, id: UserId) -> Result<(), UserError> {
        if !self.users.delete(id).await? {
            return Err(UserError::NotFound);
        }

        tracing::info!(user_id = %id, "user destroyed");

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user doesn't exist.
    pub async fn get(&self, id: UserId) -> Result<User, UserError> {
        self.users.get_by_id(id).await?.ok_or(UserError::NotFound)
    }

    /// Find a user by email, ignoring case. A malformed address finds nobody.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` for database errors.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };
        Ok(self.users.get_by_email(&email).await?)
    }

    /// One page of users, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` for database errors.
    pub async fn list(&self, page: Page) -> Result<Vec<User>, UserError> {
        Ok(self.users.list(page).await?)
    }

    /// Total number of users.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` for database errors.
    pub async fn count(&self) -> Result<i64, UserError> {
        Ok(self.users.count().await?)
    }

    /// All of a user's microposts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` for database errors.
    pub async fn microposts(&self, id: UserId) -> Result<Vec<Micropost>, UserError> {
        Ok(self.microposts.list_for_user(id).await?)
    }

    /// Number of microposts the user has written.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` for database errors.
    pub async fn micropost_count(&self, id: UserId) -> Result<i64, UserError> {
        Ok(self.microposts.count_for_user(id).await?)
    }

    /// One page of the user's feed, newest first.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` for database errors.
    pub async fn feed(&self, id: UserId, page: Page) -> Result<Vec<Micropost>, UserError> {
        Ok(self.microposts.feed(id, page).await?)
    }
}
