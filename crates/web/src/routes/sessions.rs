//! Session route handlers: password sign-in and sign-out.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_remember_token, set_remember_token};
use crate::models::UserProfile;
use crate::services::AuthService;
use crate::state::AppState;

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: SecretString,
}

/// Map a session store failure to a 500.
pub(crate) fn session_error(e: tower_sessions::session::Error) -> AppError {
    tracing::error!(error = %e, "session error");
    AppError::Internal("session error".to_string())
}

/// Sign in with email and password.
///
/// Returns 401 with "Invalid email/password combination" on failure.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignInForm>,
) -> Result<Json<UserProfile>> {
    let (user, token) = AuthService::new(state.pool())
        .sign_in(&form.email, form.password.expose_secret())
        .await?;

    set_remember_token(&session, &token)
        .await
        .map_err(session_error)?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(UserProfile::from(&user)))
}

/// Sign out. Signing out while signed out is not an error.
#[instrument(skip(state, session, user))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<StatusCode> {
    if let Some(user) = user {
        AuthService::new(state.pool()).sign_out(user.id).await?;
    }

    clear_remember_token(&session)
        .await
        .map_err(session_error)?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}
