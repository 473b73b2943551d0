use catalog_data_sqlx::{Db, DbPool};
use sqlx::pool::PoolOptions;

/// Overrides the database used by [`test_pool`].
pub const TEST_DATABASE_ENV: &str = "TEST_DATABASE_URL";

/// A single-connection pool for tests.
///
/// Defaults to a private in-memory SQLite database. One connection keeps the
/// in-memory database alive for the pool's lifetime and visible to every
/// query, transactions included.
pub async fn test_pool() -> DbPool {
    let url = std::env::var(TEST_DATABASE_ENV).unwrap_or_else(|_| "sqlite::memory:".to_string());
    PoolOptions::<Db>::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(&url)
        .await
        .unwrap_or_else(|e| panic!("failed to open test database {url}: {e}"))
}
