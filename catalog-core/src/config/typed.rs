use super::{CatalogConfig, ConfigError};

/// Metadata about a single configuration property.
#[derive(Debug, Clone)]
pub struct PropertyMeta {
    /// Absolute key (e.g., `"database.url"`).
    pub key: &'static str,
    /// Rust type name (e.g., `"u16"`).
    pub type_name: &'static str,
    /// Whether the property is required (no default and not `Option`).
    pub required: bool,
    /// Default value as a string, if any.
    pub default_value: Option<&'static str>,
    pub description: &'static str,
}

impl PropertyMeta {
    /// Environment variable that overrides this key.
    pub fn env_var(&self) -> String {
        self.key.to_uppercase().replace('.', "_")
    }
}

/// Trait for strongly-typed configuration sections.
///
/// ```ignore
/// impl ConfigProperties for DatabaseSection {
///     fn prefix() -> &'static str { "database" }
///     fn properties_metadata() -> Vec<PropertyMeta> { ... }
///     fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> { ... }
/// }
/// ```
pub trait ConfigProperties: Sized {
    /// The configuration key prefix (empty for a root section).
    fn prefix() -> &'static str;

    /// Metadata about all expected properties.
    fn properties_metadata() -> Vec<PropertyMeta>;

    /// Construct from a raw `CatalogConfig` instance.
    fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError>;
}
