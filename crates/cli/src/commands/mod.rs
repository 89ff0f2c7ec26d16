//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod users;

use secrecy::SecretString;
use sqlx::PgPool;

/// Errors shared by every command that touches the database.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the database named by `SAMPLE_APP_DATABASE_URL`
/// (or `DATABASE_URL`).
///
/// # Errors
///
/// Returns an error if neither variable is set or the connection fails.
pub async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SAMPLE_APP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConnectError::MissingEnvVar("SAMPLE_APP_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(sample_app_web::db::create_pool(&database_url).await?)
}
