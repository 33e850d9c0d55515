//! Embedded schema migrations.
//!
//! The units/checkins/checkin_extensions schema (including the partial
//! unique index that enforces one in-house checkin per unit) is applied
//! from the workspace `migrations/` directory at startup, before any
//! repository is constructed.

use sqlx::PgPool;
use tracing::info;

use stayhub_core::error::{AppError, ErrorKind};

/// Apply all pending migrations to the connected database.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let migrator = sqlx::migrate!("../../migrations");
    info!(
        migrations = migrator.iter().count(),
        "Applying schema migrations"
    );

    migrator.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Schema is up to date");
    Ok(())
}
