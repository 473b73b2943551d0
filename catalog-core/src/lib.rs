pub mod config;
pub mod error;
pub mod layers;

pub use config::{
    validate_section, CatalogConfig, ConfigError, ConfigProperties, ConfigValidationError,
    ConfigValue, FromConfigValue, MissingKeyError, PropertyMeta, ServiceConfig,
};
pub use error::RpcError;
pub use layers::{default_trace, init_tracing, LogFormat};
