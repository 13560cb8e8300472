//! Connection pool setup and connection tests.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use reelvault_core::DatabaseSettings;

/// Open a connection pool against the configured database.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool> {
    let url = settings.require_database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.timeout_seconds))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = settings.max_connections,
        "Database connected successfully"
    );
    Ok(pool)
}

/// Round-trip check: the canonical `SELECT 1`.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Database ping failed")?;
    Ok(())
}

/// Server version string, for the connection check output.
pub async fn server_version(pool: &PgPool) -> Result<String> {
    sqlx::query_scalar::<_, String>("SHOW server_version")
        .fetch_one(pool)
        .await
        .context("Failed to read server version")
}
