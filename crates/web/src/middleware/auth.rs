//! Authentication extractors.
//!
//! The session holds the raw remember token; each request resolves it to a
//! user by looking up the token's digest.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::models::session_keys;
use crate::models::user::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that requires a signed-in admin.
pub struct RequireAdmin(pub User);

/// Extractor that optionally gets the signed-in user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is signed in.
pub struct OptionalAuth(pub Option<User>);

/// Error returned when a request lacks the required user.
#[derive(Debug)]
pub enum AuthRejection {
    /// Nobody is signed in.
    Unauthorized,
    /// Signed in, but not an admin.
    Forbidden,
    /// The session or user lookup failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Please sign in.").into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Resolve the session's remember token to a user.
async fn current_user(parts: &Parts, state: &AppState) -> Result<Option<User>, AuthRejection> {
    // Set by SessionManagerLayer
    let Some(session) = parts.extensions.get::<Session>() else {
        return Ok(None);
    };

    let token = session
        .get::<String>(session_keys::REMEMBER_TOKEN)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to read session");
            AuthRejection::Internal
        })?;

    let Some(token) = token else {
        return Ok(None);
    };

    AuthService::new(state.pool())
        .user_for_remember_token(&token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to resolve remember token");
            AuthRejection::Internal
        })
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state)
            .await?
            .map(Self)
            .ok_or(AuthRejection::Unauthorized)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, state).await.ok().flatten()))
    }
}

/// Store the raw remember token in the session (sign in).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_remember_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::REMEMBER_TOKEN, token.to_owned())
        .await
}

/// Remove the remember token from the session (sign out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_remember_token(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<String>(session_keys::REMEMBER_TOKEN)
        .await?;
    Ok(())
}
