//! Blocking operation helpers for the `PostgreSQL` stores.
//!
//! Diesel is synchronous, so every query runs on tokio's blocking thread
//! pool to keep the async executor's worker threads free.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::conversation::{error::StoreError, ports::StoreResult};

/// `PostgreSQL` connection pool type.
pub type ChatPgPool = Pool<ConnectionManager<PgConnection>>;

/// Checks out a pooled connection and runs `f` on a blocking thread.
pub(super) async fn run_blocking<F, T>(pool: &ChatPgPool, f: F) -> StoreResult<T>
where
    F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool
            .get()
            .map_err(|e| StoreError::connection(e.to_string()))?;
        f(&mut connection)
    })
    .await
    .map_err(|e| StoreError::connection(format!("task join error: {e}")))?
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`StoreError::Connection`] when the pool cannot open its initial
/// connections.
pub fn build_pool(database_url: &str, max_size: u32) -> StoreResult<ChatPgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| StoreError::connection(e.to_string()))
}
