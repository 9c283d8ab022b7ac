//! Shared `PostgreSQL` plumbing for Diesel-backed adapters.
//!
//! Diesel connections are synchronous, so adapters run each unit of work on
//! tokio's blocking pool through [`run_blocking`].

use crate::config::DatabaseConfig;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Errors raised while building a connection pool.
#[derive(Debug, Error)]
pub enum PoolSetupError {
    /// No database URL was configured.
    #[error("database url is not configured")]
    MissingUrl,
    /// The pool could not open its initial connections.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Builds a connection pool from configuration.
///
/// # Errors
///
/// Returns [`PoolSetupError::MissingUrl`] when no URL is configured or
/// [`PoolSetupError::Pool`] when the pool cannot connect.
pub fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, PoolSetupError> {
    let url = config.url.as_deref().ok_or(PoolSetupError::MissingUrl)?;
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .build(manager)?;
    tracing::info!(max_connections = config.max_connections, "postgres pool ready");
    Ok(pool)
}

/// Failures of the blocking execution wrapper itself.
#[derive(Debug, Error)]
pub enum BlockingError {
    /// No connection could be checked out of the pool.
    #[error("connection checkout failed: {0}")]
    Pool(#[from] PoolError),
    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs a blocking database closure with a pooled connection.
///
/// Wraps the closure in [`tokio::task::spawn_blocking`] to keep the async
/// executor's worker threads free.
pub(crate) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<BlockingError> + Send + 'static,
{
    let shared_pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared_pool.get().map_err(|err| E::from(BlockingError::Pool(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| E::from(BlockingError::Join(err)))?
}
