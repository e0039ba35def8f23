// Idempotent schema bootstrap for the settings and permission tables

use crate::db::pool::DbPool;
use crate::db::repositories::queries::Table;
use crate::errors::DataError;
use tracing::{info, instrument};

fn create_tables_batch() -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {guilds} (
    guild_id BIGINT PRIMARY KEY,
    prefix VARCHAR(10),
    language VARCHAR(5)
);
CREATE TABLE IF NOT EXISTS {users} (
    user_id BIGINT PRIMARY KEY,
    prefix VARCHAR(10),
    language VARCHAR(5)
);
CREATE TABLE IF NOT EXISTS {permissions} (
    permission_name TEXT,
    guild_id BIGINT,
    target_id BIGINT,
    is_user BOOLEAN,
    is_whitelist BOOLEAN,
    PRIMARY KEY (permission_name, guild_id, target_id, is_user)
);
"#,
        guilds = Table::Guilds.name(),
        users = Table::Users.name(),
        permissions = Table::Permissions.name()
    )
}

/// Create all missing tables.
///
/// Issued as one batched unit of work on a single connection; a no-op when
/// the tables already exist, so process restarts are safe. Any error is a
/// boot failure and propagates to the caller.
#[instrument(skip(pool))]
pub async fn initialize(pool: &DbPool) -> Result<(), DataError> {
    info!("Creating missing database tables");

    let batch = create_tables_batch();
    pool.with_connection(move |conn| {
        Box::pin(async move {
            use sqlx::Executor;
            conn.execute(sqlx::raw_sql(&batch)).await?;
            Ok(())
        })
    })
    .await?;

    info!("Database tables ready");
    Ok(())
}
