// User settings repository

use crate::db::pool::DbPool;
use crate::db::repositories::queries::{user_queries, Table};
use crate::errors::DataError;
use crate::models::UserSettings;
use tracing::instrument;

/// Repository for per-user settings rows
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Seed the default settings row for a user.
    ///
    /// Returns `true` if a row was actually inserted, `false` if the user
    /// was already saved. Concurrent calls for the same id are resolved by
    /// the conflict clause; exactly one of them inserts.
    #[instrument(skip(self))]
    pub async fn init(&self, user_id: i64) -> Result<bool, DataError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            Table::Users.name(),
            user_queries::ALL_COLUMNS
        );
        let defaults = UserSettings::with_defaults(user_id);

        let inserted = self
            .pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    let result = sqlx::query(&sql)
                        .bind(defaults.user_id)
                        .bind(&defaults.prefix)
                        .bind(&defaults.language)
                        .execute(&mut *conn)
                        .await?;
                    Ok(result.rows_affected() > 0)
                })
            })
            .await?;

        if inserted {
            tracing::info!(user_id, "User saved with default settings");
        }
        Ok(inserted)
    }

    /// Fetch the stored settings of a user.
    ///
    /// `None` means no row exists; defaults apply but are not substituted
    /// here.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: i64) -> Result<Option<UserSettings>, DataError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 LIMIT 1",
            user_queries::ALL_COLUMNS,
            Table::Users.name()
        );

        let settings = sqlx::query_as::<_, UserSettings>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(settings)
    }

    /// Update the command prefix of a user.
    ///
    /// Zero and one affected rows both succeed silently.
    #[instrument(skip(self))]
    pub async fn set_prefix(&self, user_id: i64, prefix: &str) -> Result<(), DataError> {
        let sql = format!(
            "UPDATE {} SET prefix = $1 WHERE user_id = $2",
            Table::Users.name()
        );
        let prefix = prefix.to_owned();

        self.pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query(&sql)
                        .bind(&prefix)
                        .bind(user_id)
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .await?;

        tracing::debug!(user_id, "User prefix updated");
        Ok(())
    }

    /// Update the language of a user.
    #[instrument(skip(self))]
    pub async fn set_language(&self, user_id: i64, language: &str) -> Result<(), DataError> {
        let sql = format!(
            "UPDATE {} SET language = $1 WHERE user_id = $2",
            Table::Users.name()
        );
        let language = language.to_owned();

        self.pool
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query(&sql)
                        .bind(&language)
                        .bind(user_id)
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .await?;

        tracing::debug!(user_id, "User language updated");
        Ok(())
    }
}
