mod loader;
pub mod service;
pub mod typed;
pub mod validation;
pub mod value;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use service::{DatabaseSection, LogSection, ServiceConfig, TransportSection};
pub use typed::{ConfigProperties, PropertyMeta};
pub use validation::{validate_section, ConfigValidationError, MissingKeyError};
pub use value::{ConfigValue, FromConfigValue};

/// Environment variable selecting the active profile.
pub const PROFILE_ENV: &str = "CATALOG_PROFILE";

/// A single validation error detail from typed config validation (garde).
#[derive(Debug, Clone)]
pub struct ConfigValidationDetail {
    pub key: String,
    pub message: String,
}

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
    /// Validation errors from typed config (garde constraints).
    Validation(Vec<ConfigValidationDetail>),
    /// Startup validation rejected the configuration.
    Rejected(ConfigValidationError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Validation(details) => {
                write!(f, "Config validation errors:")?;
                for detail in details {
                    write!(f, "\n  - {}: {}", detail.key, detail.message)?;
                }
                Ok(())
            }
            ConfigError::Rejected(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigValidationError> for ConfigError {
    fn from(err: ConfigValidationError) -> Self {
        ConfigError::Rejected(err)
    }
}

/// Raw configuration loaded from YAML files, `.env` files, and environment variables.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` file (loaded into process environment)
/// 4. `.env.{profile}` file (loaded into process environment)
/// 5. Environment variables (e.g., `DATABASE_URL` overrides `database.url`)
///
/// `.env` files never overwrite already-set environment variables.
///
/// Profile is determined by: `CATALOG_PROFILE` env var > argument.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl CatalogConfig {
    /// Load configuration for the given profile from the current directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."), profile)
    }

    /// Load configuration for the given profile, looking for files in `dir`.
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let active_profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();

        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(&dir.join(format!("application-{active_profile}.yaml")), &mut values)?;

        // Missing .env files are fine; only malformed ones are reported.
        load_dotenv(dir.join(".env"))?;
        load_dotenv(dir.join(format!(".env.{active_profile}")))?;

        for (env_key, env_val) in std::env::vars() {
            values.insert(loader::env_key(&env_key), ConfigValue::String(env_val));
        }

        tracing::debug!(profile = %active_profile, keys = values.len(), "configuration loaded");

        Ok(CatalogConfig {
            values,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string (useful for testing).
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(CatalogConfig {
            values,
            profile: profile.to_string(),
        })
    }

    /// Create an empty config (useful for testing).
    pub fn empty() -> Self {
        CatalogConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    /// Set a value programmatically.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Get a typed value for the given dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning `default` if the key is missing.
    ///
    /// A present but malformed value is still an error.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> Result<V, ConfigError> {
        match self.get(key) {
            Err(ConfigError::NotFound(_)) => Ok(default),
            other => other,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

fn load_dotenv(path: PathBuf) -> Result<(), ConfigError> {
    match dotenvy::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Load(format!("{}: {e}", path.display()))),
    }
}
