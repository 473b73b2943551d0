//! Backend selection and pool construction.
//!
//! Exactly one driver is active: `postgres` when that feature is enabled,
//! otherwise `sqlite`.

use std::time::Duration;

use catalog_data::DataError;
use sqlx::pool::PoolOptions;

use crate::error::SqlxErrorExt;

#[cfg(feature = "postgres")]
pub type Db = sqlx::Postgres;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type Db = sqlx::Sqlite;

pub type DbPool = sqlx::Pool<Db>;

/// Open the shared pool once at startup.
///
/// The first connection is established eagerly so a bad connection string
/// fails the process before it starts serving.
pub async fn connect(url: &str, max_connections: u32) -> Result<DbPool, DataError> {
    let pool = PoolOptions::<Db>::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(url)
        .await
        .map_err(SqlxErrorExt::into_data_error)?;
    tracing::info!(max_connections, "Database connected");
    Ok(pool)
}
