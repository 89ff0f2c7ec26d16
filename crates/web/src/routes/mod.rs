//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Health
//! GET    /health                   - Liveness
//! GET    /health/ready             - Readiness (database reachable)
//!
//! # Static pages
//! GET    /                         - Home page (feed summary when signed in)
//! GET    /help                     - Help page
//! GET    /about                    - About page
//! GET    /contact                  - Contact page
//!
//! # Users (JSON)
//! POST   /users                    - Sign up, then sign in
//! GET    /users?page=N             - Paginated user list (requires auth)
//! GET    /users/{id}               - User profile
//! PATCH  /users/{id}               - Update own profile (requires auth)
//! DELETE /users/{id}               - Destroy a user (requires admin)
//! GET    /users/{id}/microposts    - User's microposts, newest first
//!
//! # Sessions
//! POST   /sessions                 - Sign in (rate limited)
//! DELETE /sessions                 - Sign out
//!
//! # Microposts (requires auth)
//! POST   /microposts               - Create a micropost
//! DELETE /microposts/{id}          - Delete own micropost
//! GET    /feed?page=N              - Current user's feed
//! ```

pub mod health;
pub mod microposts;
pub mod sessions;
pub mod static_pages;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route(
            "/{id}",
            get(users::show)
                .patch(users::update)
                .delete(users::destroy),
        )
        .route("/{id}/microposts", get(users::microposts))
}

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        post(sessions::create)
            .route_layer(auth_rate_limiter())
            .delete(sessions::destroy),
    )
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Static pages
        .route("/", get(static_pages::home))
        .route("/help", get(static_pages::help))
        .route("/about", get(static_pages::about))
        .route("/contact", get(static_pages::contact))
        .nest("/users", user_routes())
        .nest("/sessions", session_routes())
        .route("/microposts", post(microposts::create))
        .route("/microposts/{id}", delete(microposts::destroy))
        .route("/feed", get(microposts::feed))
}
