//! RPC patterns served by the product service.
//!
//! | Pattern | Payload | Response |
//! |---------|---------|----------|
//! | `create_product` | [`CreateProductDto`] | `Product` |
//! | `find_all_products` | [`Pageable`] (or `null`) | `Page<Product>` |
//! | `find_one_product` | [`ProductIdDto`] | `Product` |
//! | `update_product` | [`UpdateProductDto`] | `Product` |
//! | `remove_product` | [`ProductIdDto`] | `Product` |
//! | `validate_products` | [`ValidateProductsDto`] | `Product[]` |

use catalog_data::Pageable;
use catalog_rpc::RpcRouter;
use garde::Validate;

use crate::error::ServiceError;
use crate::gateway::ProductGateway;
use crate::models::{CreateProductDto, ProductIdDto, UpdateProductDto, ValidateProductsDto};
use crate::services::ProductService;

pub const CREATE_PRODUCT: &str = "create_product";
pub const FIND_ALL_PRODUCTS: &str = "find_all_products";
pub const FIND_ONE_PRODUCT: &str = "find_one_product";
pub const UPDATE_PRODUCT: &str = "update_product";
pub const REMOVE_PRODUCT: &str = "remove_product";
pub const VALIDATE_PRODUCTS: &str = "validate_products";

fn validated<T: Validate<Context = ()>>(dto: T) -> Result<T, ServiceError> {
    dto.validate()?;
    Ok(dto)
}

/// Register every product pattern on a new router.
pub fn routes<G: ProductGateway>(service: ProductService<G>) -> RpcRouter {
    let create = service.clone();
    let find_all = service.clone();
    let find_one = service.clone();
    let update = service.clone();
    let remove = service.clone();
    let validate = service;

    RpcRouter::new()
        .route(CREATE_PRODUCT, move |dto: CreateProductDto| {
            let service = create.clone();
            async move { service.create(validated(dto)?).await }
        })
        .route(FIND_ALL_PRODUCTS, move |pageable: Option<Pageable>| {
            let service = find_all.clone();
            async move {
                let pageable = validated(pageable.unwrap_or_default())?;
                service.find_all(pageable).await
            }
        })
        .route(FIND_ONE_PRODUCT, move |dto: ProductIdDto| {
            let service = find_one.clone();
            async move { service.find_one(dto.id).await }
        })
        .route(UPDATE_PRODUCT, move |dto: UpdateProductDto| {
            let service = update.clone();
            async move {
                let (id, changes) = validated(dto)?.into_parts();
                service.update(id, changes).await
            }
        })
        .route(REMOVE_PRODUCT, move |dto: ProductIdDto| {
            let service = remove.clone();
            async move { service.remove(dto.id).await }
        })
        .route(VALIDATE_PRODUCTS, move |dto: ValidateProductsDto| {
            let service = validate.clone();
            async move { service.validate_products(dto.ids).await }
        })
}
