use garde::Validate;

use super::typed::{ConfigProperties, PropertyMeta};
use super::validation::{validate_section, ConfigValidationError};
use super::{CatalogConfig, ConfigError, ConfigValidationDetail};
use crate::layers::LogFormat;

/// Immutable startup configuration of a catalog service.
///
/// Built once by [`ServiceConfig::load`] from the process entry point and
/// passed by reference to every component that needs it.
#[derive(Debug, Clone, Validate)]
pub struct ServiceConfig {
    /// HTTP tunnel listening port.
    #[garde(range(min = 1))]
    pub port: u16,
    #[garde(dive)]
    pub database: DatabaseSection,
    #[garde(dive)]
    pub transport: TransportSection,
    #[garde(skip)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Validate)]
pub struct DatabaseSection {
    #[garde(length(min = 1))]
    pub url: String,
    /// Maximum pool size.
    #[garde(range(min = 1))]
    pub connections: u32,
}

#[derive(Debug, Clone, Validate)]
pub struct TransportSection {
    /// Broker addresses, tried in order.
    #[garde(length(min = 1), inner(url))]
    pub servers: Vec<String>,
    /// Queue the service consumes requests from.
    #[garde(length(min = 1))]
    pub queue: String,
    #[garde(range(min = 1))]
    pub prefetch: u16,
}

#[derive(Debug, Clone, Default)]
pub struct LogSection {
    pub format: LogFormat,
}

impl ServiceConfig {
    /// Load and validate the configuration for `profile`.
    ///
    /// Every missing or malformed key is reported in a single error.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let raw = CatalogConfig::load(profile)?;
        Self::from_raw(&raw)
    }

    /// Validate an already loaded raw configuration.
    pub fn from_raw(raw: &CatalogConfig) -> Result<Self, ConfigError> {
        let errors = validate_section::<Self>(raw);
        if !errors.is_empty() {
            return Err(ConfigValidationError { errors }.into());
        }
        Self::from_config(raw)
    }

    /// Address the HTTP tunnel binds to.
    pub fn listen_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl ConfigProperties for ServiceConfig {
    fn prefix() -> &'static str {
        ""
    }

    fn properties_metadata() -> Vec<PropertyMeta> {
        vec![
            PropertyMeta {
                key: "port",
                type_name: "u16",
                required: true,
                default_value: None,
                description: "HTTP listening port",
            },
            PropertyMeta {
                key: "database.url",
                type_name: "String",
                required: true,
                default_value: None,
                description: "database connection string",
            },
            PropertyMeta {
                key: "database.connections",
                type_name: "u32",
                required: false,
                default_value: Some("5"),
                description: "maximum pool size",
            },
            PropertyMeta {
                key: "transport.servers",
                type_name: "Vec<String>",
                required: true,
                default_value: None,
                description: "comma-separated broker addresses",
            },
            PropertyMeta {
                key: "transport.queue",
                type_name: "String",
                required: false,
                default_value: Some("products"),
                description: "request queue name",
            },
            PropertyMeta {
                key: "transport.prefetch",
                type_name: "u16",
                required: false,
                default_value: Some("16"),
                description: "unacknowledged deliveries per consumer",
            },
            PropertyMeta {
                key: "log.format",
                type_name: "LogFormat",
                required: false,
                default_value: Some("pretty"),
                description: "log output format (pretty | json)",
            },
        ]
    }

    fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> {
        let section = ServiceConfig {
            port: config.get("port")?,
            database: DatabaseSection {
                url: config.get("database.url")?,
                connections: config.get_or("database.connections", 5)?,
            },
            transport: TransportSection {
                servers: config.get("transport.servers")?,
                queue: config.get_or("transport.queue", "products".to_string())?,
                prefetch: config.get_or("transport.prefetch", 16)?,
            },
            log: LogSection {
                format: config.get_or("log.format", LogFormat::default())?,
            },
        };

        section.validate().map_err(|report| {
            ConfigError::Validation(
                report
                    .iter()
                    .map(|(path, error)| ConfigValidationDetail {
                        key: path.to_string(),
                        message: error.to_string(),
                    })
                    .collect(),
            )
        })?;

        Ok(section)
    }
}
