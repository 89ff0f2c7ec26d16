//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use sample_app_core::ValidationErrors;

use crate::db::RepositoryError;
use crate::services::{AuthError, MicropostError, UserError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// User operation failed.
    #[error("User error: {0}")]
    User(#[from] UserError),

    /// Micropost operation failed.
    #[error("Micropost error: {0}")]
    Micropost(#[from] MicropostError),

    /// Signed in, but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body for validation failures.
#[derive(Debug, Serialize)]
struct ValidationBody<'a> {
    errors: &'a ValidationErrors,
    full_messages: Vec<String>,
}

impl AppError {
    /// The validation errors carried by this error, if any.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::User(UserError::Invalid(errors))
            | Self::Micropost(MicropostError::Invalid(errors)) => Some(errors),
            _ => None,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_))
                | Self::User(UserError::Repository(_) | UserError::PasswordHash)
                | Self::Micropost(MicropostError::Repository(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::User(UserError::Invalid(_)) | Self::Micropost(MicropostError::Invalid(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::User(UserError::NotFound) | Self::Micropost(MicropostError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        if let Some(errors) = self.validation_errors() {
            let body = ValidationBody {
                errors,
                full_messages: errors.full_messages(),
            };
            return (status, Json(body)).into_response();
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if self.is_server_error() => "Internal server error".to_string(),
            Self::Auth(AuthError::InvalidCredentials) => {
                "Invalid email/password combination".to_string()
            }
            Self::User(UserError::NotFound) => "User not found".to_string(),
            Self::Micropost(MicropostError::NotFound) => "Micropost not found".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful sign-in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Forbidden("not your micropost".to_string());
        assert_eq!(err.to_string(), "Forbidden: not your micropost");

        let err = AppError::Micropost(MicropostError::NotFound);
        assert_eq!(err.to_string(), "Micropost error: micropost not found");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Micropost(MicropostError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::User(UserError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::User(UserError::PasswordHash)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_errors_render_as_json() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "is invalid");
        let response = AppError::User(UserError::Invalid(errors)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"]["email"][0], "is invalid");
        assert_eq!(json["full_messages"][0], "Email is invalid");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response =
            AppError::Database(RepositoryError::DataCorruption("bad row 7".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }
}
