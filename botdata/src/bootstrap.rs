// Bootstrap utilities for process initialization

use crate::config::Settings;
use crate::db::{schema, DbPool};
use anyhow::{Context, Result};
use tracing::info;

/// Initialize the database pool from validated settings.
///
/// Connections are established lazily; establishment failures surface on
/// the first acquire.
#[tracing::instrument(skip(settings))]
pub fn init_database_pool(settings: &Settings) -> Result<DbPool> {
    settings
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    info!("Initializing database pool");
    let pool = DbPool::new(&settings.database);
    info!("Database pool initialized");
    Ok(pool)
}

/// Create any missing tables.
///
/// Errors here are boot failures; the process must not continue without
/// the schema in place.
#[tracing::instrument(skip(pool))]
pub async fn init_schema(pool: &DbPool) -> Result<()> {
    schema::initialize(pool)
        .await
        .context("Failed to create database tables")?;
    Ok(())
}
