//! User repository for database operations.
//!
//! Emails are stored lower-cased and compared with `LOWER(email)` so the
//! unique index and every lookup agree on case-insensitivity.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sample_app_core::{Email, UserId, UserName};

use super::{Page, RepositoryError, conflict_on_unique};
use crate::models::user::User;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    password_digest: String,
    remember_token: String,
    admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let name = UserName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid name in database: {e}"))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name,
            email,
            password_digest: row.password_digest,
            remember_token: row.remember_token,
            admin: row.admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Attributes for inserting a user. Validation and hashing happen before this point.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a UserName,
    pub email: &'a Email,
    pub password_digest: &'a str,
    pub remember_token: &'a str,
}

/// Attributes written by a profile update.
#[derive(Debug, Clone)]
pub struct UserChanges<'a> {
    pub name: &'a UserName,
    pub email: &'a Email,
    pub password_digest: &'a str,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_digest, remember_token, admin,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by email address, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_digest, remember_token, admin,
                   created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get the user whose remember token digest is `digest`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_remember_token(
        &self,
        digest: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_digest, remember_token, admin,
                   created_at, updated_at
            FROM users
            WHERE remember_token = $1
            ",
        )
        .bind(digest)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Whether another user already holds `email` (case-insensitively).
    ///
    /// `except` excludes a user's own row when checking an update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_taken(
        &self,
        email: &Email,
        except: Option<UserId>,
    ) -> Result<bool, RepositoryError> {
        let (taken,): (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1)
                  AND ($2::INT4 IS NULL OR id <> $2)
            )
            ",
        )
        .bind(email)
        .bind(except)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser<'_>) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, password_digest, remember_token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_digest, remember_token, admin,
                      created_at, updated_at
            ",
        )
        .bind(user.name.as_str())
        .bind(user.email)
        .bind(user.password_digest)
        .bind(user.remember_token)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        User::try_from(row)
    }

    /// Overwrite a user's name, email and password digest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the email belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        changes: &UserChanges<'_>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users
            SET name = $2, email = $3, password_digest = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_digest, remember_token, admin,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name.as_str())
        .bind(changes.email)
        .bind(changes.password_digest)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?
        .ok_or(RepositoryError::NotFound)?;

        User::try_from(row)
    }

    /// Replace a user's remember token digest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_remember_token(
        &self,
        id: UserId,
        digest: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET remember_token = $2
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(digest)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Grant or revoke admin rights.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_admin(&self, id: UserId, admin: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET admin = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(admin)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a user together with all of their microposts.
    ///
    /// Both deletes run in one transaction; the foreign key also cascades.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let posts = sqlx::query("DELETE FROM microposts WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = %id,
            microposts = posts.rows_affected(),
            "deleted user microposts"
        );

        Ok(result.rows_affected() > 0)
    }

    /// List users ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self, page: Page) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_digest, remember_token, admin,
                   created_at, updated_at
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Count all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
