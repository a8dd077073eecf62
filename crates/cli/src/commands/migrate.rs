//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! hearth-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `HEARTH_DATABASE_URL` - `PostgreSQL` connection string

use super::{CliError, connect};

/// Run the server's database migrations.
///
/// # Errors
///
/// Returns an error when the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
