//! User route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use sample_app_core::UserId;

use super::sessions::session_error;
use crate::db::Page;
use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::{RequireAdmin, RequireAuth, set_remember_token};
use crate::models::{Micropost, UserForm, UserProfile};
use crate::services::{AuthService, UserService};
use crate::state::AppState;

// =============================================================================
// Query and Response Types
// =============================================================================

/// Query parameters for paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    /// The requested page, defaulting to the first.
    #[must_use]
    pub fn page(&self) -> Page {
        Page::new(self.page.unwrap_or(1))
    }
}

/// One page of the user list.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserProfile>,
    pub page: u32,
    pub total: i64,
}

/// A user profile with post count.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub micropost_count: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Sign up, then sign the new user in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse> {
    let user = UserService::new(state.pool()).register(&form).await?;

    let token = AuthService::new(state.pool()).remember(user.id).await?;
    set_remember_token(&session, &token)
        .await
        .map_err(session_error)?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// List users, one page at a time.
#[instrument(skip(state, _current))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserListResponse>> {
    let users = UserService::new(state.pool());
    let page = query.page();

    let list = users.list(page).await?;
    let total = users.count().await?;

    Ok(Json(UserListResponse {
        users: list.iter().map(UserProfile::from).collect(),
        page: page.number(),
        total,
    }))
}

/// Show one user.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>> {
    let users = UserService::new(state.pool());
    let user = users.get(id).await?;
    let micropost_count = users.micropost_count(id).await?;

    Ok(Json(UserResponse {
        user: UserProfile::from(&user),
        micropost_count,
    }))
}

/// Update the signed-in user's own profile.
#[instrument(skip(state, current, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<UserId>,
    Json(form): Json<UserForm>,
) -> Result<Json<UserProfile>> {
    if current.id != id {
        return Err(AppError::Forbidden(
            "you can only edit your own profile".to_string(),
        ));
    }

    let user = UserService::new(state.pool()).update(id, &form).await?;
    Ok(Json(UserProfile::from(&user)))
}

/// Destroy a user and their microposts. Admins may not destroy themselves.
#[instrument(skip(state, admin))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    if admin.id == id {
        return Err(AppError::Forbidden(
            "admins cannot delete themselves".to_string(),
        ));
    }

    UserService::new(state.pool()).destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A user's microposts, newest first.
#[instrument(skip(state))]
pub async fn microposts(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<Micropost>>> {
    let users = UserService::new(state.pool());
    // 404 for an unknown user rather than an empty list
    users.get(id).await?;

    Ok(Json(users.microposts(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults_to_first_page() {
        assert_eq!(PageQuery::default().page(), Page::new(1));
        assert_eq!(PageQuery { page: Some(0) }.page().number(), 1);
        assert_eq!(PageQuery { page: Some(3) }.page().offset(), 60);
    }
}
