//! # catalog-products
//!
//! The product catalog service: create, paginated listing, lookup, partial
//! update, soft delete and bulk existence validation, exposed as RPC patterns.
//!
//! ```ignore
//! let gateway = SqlxProductGateway::new(pool);
//! gateway.migrate().await?;
//! let router = rpc::routes(ProductService::new(Arc::new(gateway)));
//! ```

pub mod error;
pub mod gateway;
pub mod models;
pub mod rpc;
pub mod services;

pub use error::ServiceError;
pub use gateway::{ProductGateway, SqlxProductGateway, MIGRATOR};
pub use models::{
    CreateProductDto, NewProduct, Product, ProductChanges, ProductIdDto, UpdateProductDto,
    ValidateProductsDto,
};
pub use services::ProductService;
