// Error types for the data layer

use thiserror::Error;

/// Errors surfaced by data-access operations.
///
/// Two buckets only: failures to obtain a connection from the pool, and
/// failures while executing a statement. The underlying driver error is kept
/// as the source in both cases; statement failures are not translated into
/// finer-grained domain kinds.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to acquire a database connection: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query execution failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        // Pool-side failures can also surface from single-statement calls
        // that acquire internally.
        if matches!(err, sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) {
            DataError::Connection(err)
        } else {
            DataError::Query(err)
        }
    }
}
