//! Micropost route handlers. All require a signed-in user.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use sample_app_core::MicropostId;

use super::users::PageQuery;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Micropost, MicropostForm};
use crate::services::{MicropostService, UserService};
use crate::state::AppState;

/// Create a micropost for the signed-in user.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<MicropostForm>,
) -> Result<(StatusCode, Json<Micropost>)> {
    let post = MicropostService::new(state.pool())
        .create(user.id, &form)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Delete one of the signed-in user's microposts.
///
/// Someone else's post is reported as not found.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<MicropostId>,
) -> Result<StatusCode> {
    MicropostService::new(state.pool()).delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user's feed, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn feed(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Micropost>>> {
    let posts = UserService::new(state.pool())
        .feed(user.id, query.page())
        .await?;
    Ok(Json(posts))
}
