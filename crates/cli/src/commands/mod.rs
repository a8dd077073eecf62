//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] hearth_server::store::StoreError),

    /// Invalid input.
    #[error("{0}")]
    Invalid(String),
}

/// Connect to the database named by `HEARTH_DATABASE_URL`.
pub(crate) async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("HEARTH_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("HEARTH_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(hearth_server::store::postgres::create_pool(&database_url).await?)
}
