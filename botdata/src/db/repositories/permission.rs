// Permission rule repository

use crate::db::pool::DbPool;
use crate::db::repositories::queries::{permission_queries, Table};
use crate::errors::DataError;
use crate::models::PermissionEntry;
use tracing::instrument;

/// Repository for permission allow/deny rules
#[derive(Clone)]
pub struct PermissionRepository {
    pool: DbPool,
}

impl PermissionRepository {
    /// Create a new PermissionRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All allow/deny rules for a permission inside a guild.
    ///
    /// Row order is store-determined and must not be relied upon. No
    /// matching rows yields an empty vec, not an error.
    #[instrument(skip(self))]
    pub async fn get_all(
        &self,
        permission_name: &str,
        guild_id: i64,
    ) -> Result<Vec<PermissionEntry>, DataError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE permission_name = $1 AND guild_id = $2",
            permission_queries::ALL_COLUMNS,
            Table::Permissions.name()
        );

        let entries = sqlx::query_as::<_, PermissionEntry>(&sql)
            .bind(permission_name)
            .bind(guild_id)
            .fetch_all(self.pool.pool())
            .await?;

        tracing::debug!(
            permission_name,
            guild_id,
            count = entries.len(),
            "Fetched permission rules"
        );
        Ok(entries)
    }

    /// Insert the rule for a permission target, or overwrite its
    /// allow/deny flag if the rule already exists.
    #[instrument(skip(self, entry))]
    pub async fn set(&self, entry: &PermissionEntry) -> Result<(), DataError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (permission_name, guild_id, target_id, is_user) \
             DO UPDATE SET is_whitelist = EXCLUDED.is_whitelist",
            Table::Permissions.name(),
            permission_queries::ALL_COLUMNS
        );
        let guild_id = entry.guild_id;
        let entry = entry.clone();

        self.pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query(&sql)
                        .bind(&entry.permission_name)
                        .bind(entry.guild_id)
                        .bind(entry.target_id)
                        .bind(entry.is_user)
                        .bind(entry.is_whitelist)
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!(guild_id, "Permission rule saved");
        Ok(())
    }

    /// Remove the rule for a permission target.
    ///
    /// Returns `true` if a rule existed and was removed.
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        permission_name: &str,
        guild_id: i64,
        target_id: i64,
        is_user: bool,
    ) -> Result<bool, DataError> {
        let sql = format!(
            "DELETE FROM {} WHERE permission_name = $1 AND guild_id = $2 \
             AND target_id = $3 AND is_user = $4",
            Table::Permissions.name()
        );
        let permission_name = permission_name.to_owned();

        let removed = self
            .pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    let result = sqlx::query(&sql)
                        .bind(&permission_name)
                        .bind(guild_id)
                        .bind(target_id)
                        .bind(is_user)
                        .execute(&mut *conn)
                        .await?;
                    Ok(result.rows_affected() > 0)
                })
            })
            .await?;

        if removed {
            tracing::info!(guild_id, "Permission rule removed");
        }
        Ok(removed)
    }
}
