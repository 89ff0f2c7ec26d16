//! Micropost repository for database operations.
//!
//! Every listing is ordered newest first (`created_at DESC`, ties broken by
//! `id DESC`).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sample_app_core::{MicropostId, UserId};

use super::{Page, RepositoryError};
use crate::models::micropost::{Micropost, NewMicropost};

/// Internal row type for `PostgreSQL` micropost queries.
#[derive(Debug, sqlx::FromRow)]
struct MicropostRow {
    id: i32,
    content: String,
    user_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MicropostRow> for Micropost {
    fn from(row: MicropostRow) -> Self {
        Self {
            id: MicropostId::new(row.id),
            content: row.content,
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for micropost database operations.
pub struct MicropostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MicropostRepository<'a> {
    /// Create a new micropost repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a micropost.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owning user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, post: &NewMicropost) -> Result<Micropost, RepositoryError> {
        let row = sqlx::query_as::<_, MicropostRow>(
            r"
            INSERT INTO microposts (content, user_id, created_at, updated_at)
            VALUES ($1, $2, COALESCE($3, NOW()), COALESCE($3, NOW()))
            RETURNING id, content, user_id, created_at, updated_at
            ",
        )
        .bind(&post.content)
        .bind(post.user_id)
        .bind(post.created_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get a micropost by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: MicropostId) -> Result<Option<Micropost>, RepositoryError> {
        let row = sqlx::query_as::<_, MicropostRow>(
            r"
            SELECT id, content, user_id, created_at, updated_at
            FROM microposts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Micropost::from))
    }

    /// All of a user's microposts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Micropost>, RepositoryError> {
        let rows = sqlx::query_as::<_, MicropostRow>(
            r"
            SELECT id, content, user_id, created_at, updated_at
            FROM microposts
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Micropost::from).collect())
    }

    /// One page of the posts shown to `user_id`, newest first.
    ///
    /// Without a following graph the feed is the user's own posts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn feed(&self, user_id: UserId, page: Page) -> Result<Vec<Micropost>, RepositoryError> {
        let rows = sqlx::query_as::<_, MicropostRow>(
            r"
            SELECT id, content, user_id, created_at, updated_at
            FROM microposts
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Micropost::from).collect())
    }

    /// Count a user's microposts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM microposts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Delete a micropost owned by `user_id`.
    ///
    /// # Returns
    ///
    /// Returns `true` if the post was deleted, `false` if it didn't exist or
    /// belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, user_id: UserId, id: MicropostId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM microposts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
