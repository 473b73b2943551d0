use std::collections::BTreeSet;
use std::sync::Arc;

use catalog_data::{DataError, Page, Pageable};

use crate::error::{ServiceError, PRODUCTS_NOT_FOUND, REQUEST_ERROR};
use crate::gateway::ProductGateway;
use crate::models::{CreateProductDto, Product, ProductChanges};

/// Product use cases on top of a [`ProductGateway`].
///
/// Driver errors are logged here and folded into [`ServiceError`]; callers
/// never see the raw store message.
pub struct ProductService<G> {
    gateway: Arc<G>,
}

impl<G> Clone for ProductService<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<G: ProductGateway> ProductService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn create(&self, dto: CreateProductDto) -> Result<Product, ServiceError> {
        let product = self.gateway.insert(dto.into()).await.map_err(|err| match err {
            DataError::Database(_) => {
                tracing::warn!(error = %err, "Product insert rejected");
                ServiceError::BadRequest(REQUEST_ERROR.to_string())
            }
            other => unexpected(other),
        })?;
        tracing::debug!(id = product.id, "Product created");
        Ok(product)
    }

    pub async fn find_all(&self, pageable: Pageable) -> Result<Page<Product>, ServiceError> {
        let (products, total) = self
            .gateway
            .find_page(pageable.offset(), pageable.limit)
            .await
            .map_err(unexpected)?;
        Ok(Page::new(products, &pageable, total))
    }

    pub async fn find_one(&self, id: i64) -> Result<Product, ServiceError> {
        self.gateway
            .find_live(id)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| ServiceError::product_not_found(id))
    }

    pub async fn update(&self, id: i64, changes: ProductChanges) -> Result<Product, ServiceError> {
        tracing::debug!(id, "Updating product");
        self.gateway
            .update_live(id, changes)
            .await
            .map_err(|err| fold_mutation_error(id, err))
    }

    /// Soft delete: the row stays, with `available = false`.
    pub async fn remove(&self, id: i64) -> Result<Product, ServiceError> {
        tracing::debug!(id, "Removing product");
        self.gateway
            .soft_delete(id)
            .await
            .map_err(|err| fold_mutation_error(id, err))
    }

    /// Every distinct id must name a live product. The result is not in input order.
    pub async fn validate_products(&self, ids: Vec<i64>) -> Result<Vec<Product>, ServiceError> {
        let distinct: Vec<i64> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let products = self
            .gateway
            .find_live_by_ids(&distinct)
            .await
            .map_err(unexpected)?;
        if products.len() != distinct.len() {
            tracing::debug!(
                requested = distinct.len(),
                found = products.len(),
                "Product validation failed"
            );
            return Err(ServiceError::BadRequest(PRODUCTS_NOT_FOUND.to_string()));
        }
        Ok(products)
    }
}

fn fold_mutation_error(id: i64, err: DataError) -> ServiceError {
    match err {
        DataError::NotFound(_) => ServiceError::product_not_found(id),
        DataError::Database(_) => {
            tracing::warn!(id, error = %err, "Product mutation failed");
            ServiceError::BadRequest(REQUEST_ERROR.to_string())
        }
        other => unexpected(other),
    }
}

fn unexpected(err: DataError) -> ServiceError {
    tracing::error!(error = %err, "Unexpected data layer failure");
    ServiceError::internal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Gateway double: an in-memory table, optionally failing every call.
    #[derive(Default)]
    struct MockGateway {
        rows: Mutex<Vec<Product>>,
        failure: Option<fn() -> DataError>,
    }

    impl MockGateway {
        fn failing(failure: fn() -> DataError) -> Self {
            Self {
                failure: Some(failure),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), DataError> {
            match self.failure {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }

        fn live(&self) -> Vec<Product> {
            let rows = self.rows.lock().unwrap();
            rows.iter().filter(|p| p.available).cloned().collect()
        }
    }

    impl ProductGateway for MockGateway {
        async fn insert(&self, product: NewProduct) -> Result<Product, DataError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let now = Utc::now();
            let row = Product {
                id: rows.len() as i64 + 1,
                name: product.name,
                description: product.description,
                price: product.price,
                available: product.available,
                created_at: now,
                updated_at: now,
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn find_page(&self, offset: u64, limit: u64) -> Result<(Vec<Product>, u64), DataError> {
            self.check()?;
            let live = self.live();
            let total = live.len() as u64;
            let page = live
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            Ok((page, total))
        }

        async fn find_live(&self, id: i64) -> Result<Option<Product>, DataError> {
            self.check()?;
            Ok(self.live().into_iter().find(|p| p.id == id))
        }

        async fn find_live_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, DataError> {
            self.check()?;
            Ok(self.live().into_iter().filter(|p| ids.contains(&p.id)).collect())
        }

        async fn update_live(&self, id: i64, changes: ProductChanges) -> Result<Product, DataError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|p| p.id == id && p.available)
                .ok_or_else(|| DataError::NotFound("Row not found".into()))?;
            if let Some(available) = changes.available {
                row.available = available;
            }
            if let Some(name) = changes.name {
                row.name = name;
            }
            Ok(row.clone())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DataError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn count_live(&self) -> Result<u64, DataError> {
            self.check()?;
            Ok(self.live().len() as u64)
        }
    }

    #[derive(Debug)]
    struct DriverFailure;

    impl std::fmt::Display for DriverFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violated on column secret_internal_name")
        }
    }

    impl std::error::Error for DriverFailure {}

    fn database_failure() -> DataError {
        DataError::database(DriverFailure)
    }

    fn other_failure() -> DataError {
        DataError::Other("pool closed".into())
    }

    fn service(gateway: MockGateway) -> ProductService<MockGateway> {
        ProductService::new(Arc::new(gateway))
    }

    fn dto(name: &str, price: f64) -> CreateProductDto {
        CreateProductDto {
            name: name.into(),
            price,
            description: None,
            available: true,
        }
    }

    #[tokio::test]
    async fn test_create_then_remove_hides_product() {
        let svc = service(MockGateway::default());
        let created = svc.create(dto("A", 10.0)).await.unwrap();
        assert!(created.available);

        assert_eq!(svc.find_one(created.id).await.unwrap().name, "A");
        let removed = svc.remove(created.id).await.unwrap();
        assert!(!removed.available);
        assert_eq!(
            svc.find_one(created.id).await.unwrap_err(),
            ServiceError::product_not_found(created.id)
        );
        assert!(svc.gateway().find_by_id(created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_all_meta() {
        let svc = service(MockGateway::default());
        for i in 0..7 {
            svc.create(dto(&format!("p{i}"), 1.0)).await.unwrap();
        }
        let page = svc.find_all(Pageable::new(2, 3)).await.unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.data[0].name, "p3");
        assert_eq!(page.meta.total_pages, 7);
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.meta.last_page, 3);
    }

    #[tokio::test]
    async fn test_validate_dedupes_ids() {
        let svc = service(MockGateway::default());
        svc.create(dto("a", 1.0)).await.unwrap();
        svc.create(dto("b", 1.0)).await.unwrap();

        assert_eq!(svc.validate_products(vec![1, 1, 2]).await.unwrap().len(), 2);
        assert_eq!(
            svc.validate_products(vec![1, 999]).await.unwrap_err(),
            ServiceError::BadRequest(PRODUCTS_NOT_FOUND.into())
        );
        assert!(svc.validate_products(vec![]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutation_database_error_is_generic_bad_request() {
        let svc = service(MockGateway::failing(database_failure));
        let err = svc.update(1, ProductChanges::default()).await.unwrap_err();
        assert_eq!(err, ServiceError::BadRequest(REQUEST_ERROR.into()));
        assert!(!err.message().contains("secret_internal_name"));

        let err = svc.remove(1).await.unwrap_err();
        assert_eq!(err, ServiceError::BadRequest(REQUEST_ERROR.into()));
    }

    #[tokio::test]
    async fn test_mutation_not_found_is_distinguished() {
        let svc = service(MockGateway::default());
        assert_eq!(
            svc.update(42, ProductChanges::default()).await.unwrap_err(),
            ServiceError::product_not_found(42)
        );
        assert_eq!(svc.remove(42).await.unwrap_err(), ServiceError::product_not_found(42));
    }

    #[tokio::test]
    async fn test_unclassified_failures_are_internal() {
        let svc = service(MockGateway::failing(other_failure));
        assert_eq!(svc.remove(1).await.unwrap_err(), ServiceError::internal());
        assert_eq!(svc.create(dto("a", 1.0)).await.unwrap_err(), ServiceError::internal());

        let svc = service(MockGateway::failing(database_failure));
        assert_eq!(svc.find_one(1).await.unwrap_err(), ServiceError::internal());
        assert_eq!(
            svc.find_all(Pageable::default()).await.unwrap_err(),
            ServiceError::internal()
        );
        assert_eq!(
            svc.validate_products(vec![1]).await.unwrap_err(),
            ServiceError::internal()
        );
    }

    #[tokio::test]
    async fn test_create_database_error_is_bad_request() {
        let svc = service(MockGateway::failing(database_failure));
        assert_eq!(
            svc.create(dto("a", 1.0)).await.unwrap_err(),
            ServiceError::BadRequest(REQUEST_ERROR.into())
        );
    }
}
