//! Database migration command.
//!
//! Applies the SQL files in `crates/api/migrations/` (embedded at compile
//! time) to the database named by `SUSHI_DATABASE_URL`.

use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    tracing::info!("Connecting to database...");
    let pool = super::connect()
        .await
        .map_err(|e| MigrationError::Connect(e.to_string()))?;

    let migrator = sqlx::migrate!("../api/migrations");
    tracing::info!(count = migrator.iter().count(), "Running migrations...");

    migrator.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
