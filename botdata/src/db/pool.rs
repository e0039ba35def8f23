// PostgreSQL connection pool and scoped connection access

use crate::config::DatabaseConfig;
use crate::errors::DataError;
use futures::future::BoxFuture;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::PgConnection;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Bounded connection pool to the relational store.
///
/// Holds between zero and `max_connections` live connections. Connections
/// are established lazily, so establishment failures (timeout, auth,
/// network) surface on the first acquire rather than at construction.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Create the pool from the externally supplied connection parameters.
    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            // Reuse is decided by the local check at release time; no
            // ping round trip before handing a connection out.
            .test_before_acquire(false)
            .connect_lazy_with(options);

        info!(
            max_connections = config.max_connections,
            connect_timeout_seconds = config.connect_timeout_seconds,
            "Database connection pool initialized"
        );

        Self { pool }
    }

    /// The underlying pool, for single-statement operations that release
    /// implicitly through the pool's own per-call accounting.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Borrow one connection, run one unit of work on it, and decide the
    /// connection's fate from a local check of the outcome.
    ///
    /// A clean result, or any failure that leaves the connection itself
    /// intact (a constraint violation, a malformed statement), returns the
    /// connection to the pool on scope exit. An I/O, TLS or protocol-level
    /// failure means the physical connection can no longer be trusted: it is
    /// detached and dropped, and the pool recreates capacity lazily on a
    /// later acquire. The check never costs a server round trip, and the
    /// work's result reaches the caller either way.
    pub async fn with_connection<T, F>(&self, work: F) -> Result<T, DataError>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<T>>,
    {
        let mut conn = self.pool.acquire().await.map_err(DataError::Connection)?;

        let outcome = work(&mut conn).await;

        if let Err(err) = &outcome {
            if connection_poisoned(err) {
                warn!(error = %err, "Discarding connection after failed unit of work");
                let _ = conn.detach();
            }
        }

        outcome.map_err(DataError::Query)
    }

    /// Current number of connections in the pool
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Number of idle connections in the pool
    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Gracefully close every pooled connection.
    ///
    /// Called once at process shutdown; acquires fail afterwards.
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

/// Local-only health classification of a failed unit of work.
fn connection_poisoned(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_)
    )
}
