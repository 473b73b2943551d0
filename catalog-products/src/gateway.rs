//! Persistence gateway for the `product` table.
//!
//! "Live" rows are the ones with `available = TRUE`. Every read and mutation
//! except [`ProductGateway::find_by_id`] filters on it.

use std::future::Future;

use catalog_data::DataError;
use catalog_data_sqlx::{Db, DbPool, SqlxErrorExt};
use chrono::Utc;
use sqlx::migrate::Migrator;
use sqlx::QueryBuilder;

use crate::models::{NewProduct, Product, ProductChanges};

#[cfg(feature = "postgres")]
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");

#[cfg(not(feature = "postgres"))]
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

const COLUMNS: &str = "id, name, description, price, available, created_at, updated_at";

/// Ids bound per `IN (...)` statement, well below SQLite's 32766 parameter cap.
const IDS_PER_STATEMENT: usize = 1000;

/// Storage operations the product service relies on.
///
/// Each method is atomic on its own; the two-statement ones run inside a
/// single transaction.
pub trait ProductGateway: Send + Sync + 'static {
    fn insert(&self, product: NewProduct) -> impl Future<Output = Result<Product, DataError>> + Send;

    /// A window of live rows ordered by id, plus the live count seen by the same transaction.
    fn find_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<(Vec<Product>, u64), DataError>> + Send;

    fn find_live(&self, id: i64) -> impl Future<Output = Result<Option<Product>, DataError>> + Send;

    /// Live rows among `ids`, ordered by id. Large id lists are read in
    /// several statements within one transaction.
    fn find_live_by_ids(
        &self,
        ids: &[i64],
    ) -> impl Future<Output = Result<Vec<Product>, DataError>> + Send;

    /// Apply `changes` to a live row. Fails with [`DataError::NotFound`] when
    /// no live row has this id, leaving the table untouched.
    fn update_live(
        &self,
        id: i64,
        changes: ProductChanges,
    ) -> impl Future<Output = Result<Product, DataError>> + Send;

    fn soft_delete(&self, id: i64) -> impl Future<Output = Result<Product, DataError>> + Send {
        self.update_live(id, ProductChanges::soft_delete())
    }

    /// Raw read that also sees soft-deleted rows.
    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Product>, DataError>> + Send;

    fn count_live(&self) -> impl Future<Output = Result<u64, DataError>> + Send;
}

/// [`ProductGateway`] over the shared SQLx pool.
#[derive(Clone)]
pub struct SqlxProductGateway {
    pool: DbPool,
}

impl SqlxProductGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create the schema.
    pub async fn migrate(&self) -> Result<(), DataError> {
        MIGRATOR.run(&self.pool).await.map_err(DataError::database)?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

impl ProductGateway for SqlxProductGateway {
    async fn insert(&self, product: NewProduct) -> Result<Product, DataError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO product (name, description, price, available, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<Db, Product>(&sql)
            .bind(product.name)
            .bind(product.description)
            .bind(product.price)
            .bind(product.available)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<(Vec<Product>, u64), DataError> {
        let mut tx = self.pool.begin().await.map_err(SqlxErrorExt::into_data_error)?;

        let sql = format!(
            "SELECT {COLUMNS} FROM product WHERE available = TRUE ORDER BY id LIMIT $1 OFFSET $2"
        );
        let products = sqlx::query_as::<Db, Product>(&sql)
            .bind(to_i64(limit))
            .bind(to_i64(offset))
            .fetch_all(&mut *tx)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;

        let total: i64 =
            sqlx::query_scalar::<Db, i64>("SELECT COUNT(*) FROM product WHERE available = TRUE")
                .fetch_one(&mut *tx)
                .await
                .map_err(SqlxErrorExt::into_data_error)?;

        tx.commit().await.map_err(SqlxErrorExt::into_data_error)?;
        Ok((products, to_u64(total)))
    }

    async fn find_live(&self, id: i64) -> Result<Option<Product>, DataError> {
        let sql = format!("SELECT {COLUMNS} FROM product WHERE id = $1 AND available = TRUE");
        sqlx::query_as::<Db, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn find_live_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, DataError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut tx = self.pool.begin().await.map_err(SqlxErrorExt::into_data_error)?;

        let mut products = Vec::new();
        for chunk in ids.chunks(IDS_PER_STATEMENT) {
            let mut query = QueryBuilder::<Db>::new(format!(
                "SELECT {COLUMNS} FROM product WHERE available = TRUE AND id IN ("
            ));
            let mut list = query.separated(", ");
            for id in chunk {
                list.push_bind(*id);
            }
            list.push_unseparated(")");

            let found = query
                .build_query_as::<Product>()
                .fetch_all(&mut *tx)
                .await
                .map_err(SqlxErrorExt::into_data_error)?;
            products.extend(found);
        }

        tx.commit().await.map_err(SqlxErrorExt::into_data_error)?;
        products.sort_by_key(|product| product.id);
        products.dedup_by_key(|product| product.id);
        Ok(products)
    }

    async fn update_live(&self, id: i64, changes: ProductChanges) -> Result<Product, DataError> {
        let mut tx = self.pool.begin().await.map_err(SqlxErrorExt::into_data_error)?;

        // Existence check; RowNotFound rolls the transaction back on drop.
        sqlx::query_scalar::<Db, i64>("SELECT id FROM product WHERE id = $1 AND available = TRUE")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;

        let mut query = QueryBuilder::<Db>::new("UPDATE product SET updated_at = ");
        query.push_bind(Utc::now());
        if let Some(name) = changes.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(description) = changes.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(price) = changes.price {
            query.push(", price = ").push_bind(price);
        }
        if let Some(available) = changes.available {
            query.push(", available = ").push_bind(available);
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {COLUMNS}"));

        let updated = query
            .build_query_as::<Product>()
            .fetch_one(&mut *tx)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;

        tx.commit().await.map_err(SqlxErrorExt::into_data_error)?;
        Ok(updated)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DataError> {
        let sql = format!("SELECT {COLUMNS} FROM product WHERE id = $1");
        sqlx::query_as::<Db, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn count_live(&self) -> Result<u64, DataError> {
        let total: i64 =
            sqlx::query_scalar::<Db, i64>("SELECT COUNT(*) FROM product WHERE available = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(SqlxErrorExt::into_data_error)?;
        Ok(to_u64(total))
    }
}
