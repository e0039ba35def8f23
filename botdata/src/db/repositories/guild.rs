// Guild settings repository

use crate::db::pool::DbPool;
use crate::db::repositories::queries::{guild_queries, Table};
use crate::errors::DataError;
use crate::models::GuildSettings;
use tracing::instrument;

/// Repository for per-guild settings rows
#[derive(Clone)]
pub struct GuildRepository {
    pool: DbPool,
}

impl GuildRepository {
    /// Create a new GuildRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Seed the default settings row for a guild.
    ///
    /// Safe to call unconditionally on every interaction: the conflict
    /// clause makes concurrent identical inserts race-free without a prior
    /// existence check. Returns `true` if a row was actually inserted,
    /// `false` if the guild was already saved.
    #[instrument(skip(self))]
    pub async fn init(&self, guild_id: i64) -> Result<bool, DataError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            Table::Guilds.name(),
            guild_queries::ALL_COLUMNS
        );
        let defaults = GuildSettings::with_defaults(guild_id);

        let inserted = self
            .pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    let result = sqlx::query(&sql)
                        .bind(defaults.guild_id)
                        .bind(&defaults.prefix)
                        .bind(&defaults.language)
                        .execute(&mut *conn)
                        .await?;
                    Ok(result.rows_affected() > 0)
                })
            })
            .await?;

        if inserted {
            tracing::info!(guild_id, "Guild saved with default settings");
        }
        Ok(inserted)
    }

    /// Fetch the stored settings of a guild.
    ///
    /// `None` means no row exists; defaults apply but are not substituted
    /// here.
    #[instrument(skip(self))]
    pub async fn get(&self, guild_id: i64) -> Result<Option<GuildSettings>, DataError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE guild_id = $1 LIMIT 1",
            guild_queries::ALL_COLUMNS,
            Table::Guilds.name()
        );

        let settings = sqlx::query_as::<_, GuildSettings>(&sql)
            .bind(guild_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(settings)
    }

    /// Update the command prefix of a guild.
    ///
    /// Completes once the statement is drained; zero and one affected rows
    /// both succeed silently.
    #[instrument(skip(self))]
    pub async fn set_prefix(&self, guild_id: i64, prefix: &str) -> Result<(), DataError> {
        let sql = format!(
            "UPDATE {} SET prefix = $1 WHERE guild_id = $2",
            Table::Guilds.name()
        );
        let prefix = prefix.to_owned();

        self.pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query(&sql)
                        .bind(&prefix)
                        .bind(guild_id)
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .await?;

        tracing::debug!(guild_id, "Guild prefix updated");
        Ok(())
    }

    /// Update the language of a guild.
    #[instrument(skip(self))]
    pub async fn set_language(&self, guild_id: i64, language: &str) -> Result<(), DataError> {
        let sql = format!(
            "UPDATE {} SET language = $1 WHERE guild_id = $2",
            Table::Guilds.name()
        );
        let language = language.to_owned();

        self.pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query(&sql)
                        .bind(&language)
                        .bind(guild_id)
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .await?;

        tracing::debug!(guild_id, "Guild language updated");
        Ok(())
    }
}
