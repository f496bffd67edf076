//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Diesel connections are synchronous, so every adapter offloads its work
//! to Tokio's blocking pool through [`run_blocking_with`].

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// Pool checkout failures go through `pool_err`, join failures through
/// `join_err`.
pub(crate) async fn run_blocking_with<F, T, E, P, J>(
    pool: &PgPool,
    f: F,
    pool_err: P,
    join_err: J,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    P: FnOnce(PoolError) -> E + Send + 'static,
    J: FnOnce(tokio::task::JoinError) -> E,
{
    let shared_pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared_pool.get().map_err(pool_err)?;
        f(&mut connection)
    })
    .await
    .map_err(join_err)?
}
