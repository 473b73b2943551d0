//! # catalog-data-sqlx
//!
//! SQLx-specific pieces of the catalog data layer. It depends on
//! [`catalog-data`] for the abstract types and adds the backend selection,
//! the shared pool, and error bridging.
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) |
//! | `postgres` | PostgreSQL via `sqlx/postgres`, takes precedence over `sqlite` |
//!
//! # Error bridging
//!
//! ```ignore
//! use catalog_data_sqlx::SqlxErrorExt;
//!
//! let product = sqlx::query_as("SELECT ...")
//!     .fetch_one(&pool)
//!     .await
//!     .map_err(|e| e.into_data_error())?;
//! ```

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable one of the `sqlite` or `postgres` features");

pub mod error;
pub mod pool;

pub use error::SqlxErrorExt;
pub use pool::{connect, Db, DbPool};
