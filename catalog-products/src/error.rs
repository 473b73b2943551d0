use catalog_core::RpcError;

pub const REQUEST_ERROR: &str = "request error";
pub const INTERNAL_ERROR: &str = "internal server error";
pub const PRODUCTS_NOT_FOUND: &str = "some products were not found";

/// Caller-visible failure of a product operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ServiceError {
    pub fn product_not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("Product with id #{id} not found"))
    }

    pub fn internal() -> Self {
        ServiceError::Internal(INTERNAL_ERROR.to_string())
    }

    pub fn status(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::BadRequest(_) => 400,
            ServiceError::Internal(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::NotFound(msg)
            | ServiceError::BadRequest(msg)
            | ServiceError::Internal(msg) => msg,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            ServiceError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<garde::Report> for ServiceError {
    fn from(report: garde::Report) -> Self {
        ServiceError::BadRequest(report.to_string().trim_end().to_string())
    }
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        RpcError::new(err.status(), err.message())
    }
}
