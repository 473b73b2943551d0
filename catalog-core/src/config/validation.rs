use super::typed::ConfigProperties;
use super::{CatalogConfig, ConfigError};

/// A single missing or invalid config key.
#[derive(Debug)]
pub struct MissingKeyError {
    /// Section that requires this key.
    pub source: String,
    pub key: String,
    pub expected_type: String,
    /// Environment variable hint.
    pub env_hint: String,
    pub description: Option<String>,
}

impl std::fmt::Display for MissingKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  - `{}`: key '{}' ({}), set env var `{}`",
            self.source, self.key, self.expected_type, self.env_hint
        )?;
        if let Some(desc) = &self.description {
            write!(f, " -- {desc}")?;
        }
        Ok(())
    }
}

/// Aggregated config validation error.
#[derive(Debug)]
pub struct ConfigValidationError {
    pub errors: Vec<MissingKeyError>,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid configuration:")?;
        for err in &self.errors {
            write!(f, "\n{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

fn env_hint(key: &str) -> String {
    let base = key.split('[').next().unwrap_or(key);
    base.to_uppercase().replace('.', "_")
}

fn source_name<C: ConfigProperties>() -> String {
    match C::prefix() {
        "" => "root".to_string(),
        prefix => prefix.to_string(),
    }
}

/// Validate a `ConfigProperties` section against a `CatalogConfig`.
///
/// Reports every missing required key at once. When all keys are present,
/// the section is constructed to surface type mismatches and validation
/// failures.
pub fn validate_section<C: ConfigProperties>(config: &CatalogConfig) -> Vec<MissingKeyError> {
    let source = source_name::<C>();

    let mut errors: Vec<MissingKeyError> = C::properties_metadata()
        .iter()
        .filter(|prop| prop.required && !config.contains_key(prop.key))
        .map(|prop| MissingKeyError {
            source: source.clone(),
            key: prop.key.to_string(),
            expected_type: prop.type_name.to_string(),
            env_hint: prop.env_var(),
            description: Some(prop.description.to_string()),
        })
        .collect();

    if !errors.is_empty() {
        return errors;
    }

    match C::from_config(config) {
        Ok(_) => {}
        Err(ConfigError::TypeMismatch { key, expected }) => errors.push(MissingKeyError {
            source,
            env_hint: env_hint(&key),
            key,
            expected_type: expected.to_string(),
            description: Some(format!("type mismatch: expected {expected}")),
        }),
        Err(ConfigError::Validation(details)) => {
            for detail in details {
                errors.push(MissingKeyError {
                    source: source.clone(),
                    env_hint: env_hint(&detail.key),
                    key: detail.key,
                    expected_type: "valid".to_string(),
                    description: Some(detail.message),
                });
            }
        }
        Err(ConfigError::NotFound(key)) => errors.push(MissingKeyError {
            source,
            env_hint: env_hint(&key),
            key,
            expected_type: "unknown".to_string(),
            description: None,
        }),
        Err(other) => errors.push(MissingKeyError {
            source,
            key: String::new(),
            expected_type: "unknown".to_string(),
            env_hint: String::new(),
            description: Some(other.to_string()),
        }),
    }

    errors
}
