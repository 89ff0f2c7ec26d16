//! Integration tests for the sample app.
//!
//! # Running Tests
//!
//! ```bash
//! # Point the tests at a disposable database
//! export SAMPLE_APP_TEST_DATABASE_URL=postgres://localhost/sample_app_test
//!
//! # Run integration tests (they are ignored by default)
//! cargo test -p sample-app-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `users` - Model rules against the database (uniqueness, feed, cascade)
//! - `http` - The router served on an ephemeral port, driven with `reqwest`

#![allow(clippy::expect_used)]

use std::net::SocketAddr;

use reqwest::Client;
use secrecy::SecretString;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower_sessions_sqlx_store::PostgresStore;
use url::Url;
use uuid::Uuid;

use sample_app_web::config::AppConfig;
use sample_app_web::db;
use sample_app_web::state::AppState;

/// Environment variable naming the test database.
pub const TEST_DATABASE_URL_VAR: &str = "SAMPLE_APP_TEST_DATABASE_URL";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection string for the test database.
///
/// # Panics
///
/// Panics if `SAMPLE_APP_TEST_DATABASE_URL` is not set.
#[must_use]
pub fn test_database_url() -> String {
    std::env::var(TEST_DATABASE_URL_VAR)
        .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL_VAR} must be set"))
}

/// Connect to the test database and bring its schema up to date.
///
/// # Panics
///
/// Panics if the database is unreachable or a migration fails.
pub async fn test_pool() -> PgPool {
    let url = SecretString::from(test_database_url());
    let pool = db::create_pool(&url)
        .await
        .expect("Failed to connect to test database");

    // Once per test binary; each test runs on its own runtime and pool
    MIGRATED
        .get_or_init(|| async {
            db::migrate(&pool)
                .await
                .expect("Failed to run migrations");
            PostgresStore::new(pool.clone())
                .migrate()
                .await
                .expect("Failed to create session store");
        })
        .await;

    pool
}

/// An email address no other test will use.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

/// The application served on an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub pool: PgPool,
}

impl TestServer {
    /// Start the router against the test database.
    ///
    /// # Panics
    ///
    /// Panics if the database or the listener cannot be set up.
    pub async fn start() -> Self {
        let pool = test_pool().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        let config = AppConfig {
            database_url: SecretString::from(test_database_url()),
            host: addr.ip(),
            port: addr.port(),
            base_url: Url::parse(&format!("http://{addr}")).expect("valid base url"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        let router = sample_app_web::app(AppState::new(config, pool.clone()));

        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client that keeps the session cookie between requests.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }
}
