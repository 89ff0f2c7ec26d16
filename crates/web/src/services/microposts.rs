//! Micropost service.

use sqlx::PgPool;
use thiserror::Error;

use sample_app_core::{MicropostId, UserId, ValidationErrors};

use crate::db::RepositoryError;
use crate::db::microposts::MicropostRepository;
use crate::models::micropost::{Micropost, MicropostForm, NewMicropost};

/// Errors that can occur during micropost operations.
#[derive(Debug, Error)]
pub enum MicropostError {
    /// The submitted content failed validation; nothing was written.
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),

    /// Micropost (or its author) not found.
    #[error("micropost not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for MicropostError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// Micropost service.
pub struct MicropostService<'a> {
    microposts: MicropostRepository<'a>,
}

impl<'a> MicropostService<'a> {
    /// Create a new micropost service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            microposts: MicropostRepository::new(pool),
        }
    }

    /// Validate and save a micropost authored by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `MicropostError::Invalid` if the content fails validation.
    /// Returns `MicropostError::NotFound` if the author doesn't exist.
    /// Returns `MicropostError::Repository` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        form: &MicropostForm,
    ) -> Result<Micropost, MicropostError> {
        let content = form.validate()?;
        let post = self
            .microposts
            .create(&NewMicropost::new(user_id, content))
            .await?;

        tracing::info!(user_id = %user_id, micropost_id = %post.id, "micropost created");

        Ok(post)
    }

    /// Delete one of `user_id`'s microposts.
    ///
    /// # Errors
    ///
    /// Returns `MicropostError::NotFound` if the post doesn't exist or belongs
    /// to another user.
    /// Returns `MicropostError::Repository` for database errors.
    pub async fn delete(&self, user_id: UserId, id: MicropostId) -> Result<(), MicropostError> {
        if !self.microposts.delete(user_id, id).await? {
            return Err(MicropostError::NotFound);
        }

        tracing::info!(user_id = %user_id, micropost_id = %id, "micropost deleted");

        Ok(())
    }

    /// Get a micropost by ID.
    ///
    /// # Errors
    ///
    /// Returns `MicropostError::NotFound` if the post doesn't exist.
    pub async fn get(&self, id: MicropostId) -> Result<Micropost, MicropostError> {
        self.microposts
            .get_by_id(id)
            .await?
            .ok_or(MicropostError::NotFound)
    }
}
