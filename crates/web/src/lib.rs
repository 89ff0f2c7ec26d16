//! Sample App web library.
//!
//! A small microblogging application: users sign up, sign in and post
//! short messages. The binary in `main.rs` wires [`app`] to a listener;
//! tests drive the same router directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod helpers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.pool(), state.config());

    routes::routes()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::AppConfig;

    /// Router over a pool that never connects; only handlers that stay off
    /// the database can be exercised.
    fn test_app() -> Router {
        let config = AppConfig {
            database_url: SecretString::from("postgres://localhost:1/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: Url::parse("http://localhost:3000").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        app(AppState::new(config, pool))
    }

    async fn get(uri: &str) -> axum::response::Response {
        test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_static_pages_have_titles() {
        for (path, title) in [
            ("/help", "Help | Ruby on Rails Tutorial Sample App"),
            ("/about", "About Us | Ruby on Rails Tutorial Sample App"),
            ("/contact", "Contact | Ruby on Rails Tutorial Sample App"),
        ] {
            let response = get(path).await;
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            let html = body_text(response).await;
            assert!(html.contains(&format!("<title>{title}</title>")), "{path}");
        }
    }

    #[tokio::test]
    async fn test_home_without_session_is_public() {
        let response = get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<title>Ruby on Rails Tutorial Sample App</title>"));
        assert!(html.contains("Welcome to the Sample App"));
    }

    #[tokio::test]
    async fn test_protected_routes_require_sign_in() {
        let app = test_app();
        for (method, uri) in [
            ("GET", "/users"),
            ("GET", "/feed"),
            ("POST", "/microposts"),
            ("DELETE", "/microposts/1"),
            ("PATCH", "/users/1"),
            ("DELETE", "/users/1"),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header("content-type", "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        assert_eq!(get("/nope").await.status(), StatusCode::NOT_FOUND);
    }
}
