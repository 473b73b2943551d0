use super::ConfigError;

/// A single configuration value that can be converted to various types.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    pub(crate) fn from_yaml(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(*b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    ConfigValue::Float(f)
                } else {
                    ConfigValue::String(n.to_string())
                }
            }
            serde_yaml::Value::String(s) => ConfigValue::String(s.clone()),
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Sequence(seq) => {
                ConfigValue::List(seq.iter().map(ConfigValue::from_yaml).collect())
            }
            other => ConfigValue::String(format!("{other:?}")),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Null => "null",
            ConfigValue::List(_) => "list",
        }
    }
}

/// Trait for converting a `ConfigValue` into a concrete type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a config value type",
    label = "not a valid config value type",
    note = "built-in types: String, integers, bool, Option<T>, Vec<T>. Implement `FromConfigValue` for custom types."
)]
pub trait FromConfigValue: Sized {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError>;
}

fn mismatch(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

impl FromConfigValue for String {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::String(s) => Ok(s.clone()),
            ConfigValue::Integer(i) => Ok(i.to_string()),
            ConfigValue::Float(f) => Ok(f.to_string()),
            ConfigValue::Bool(b) => Ok(b.to_string()),
            ConfigValue::Null | ConfigValue::List(_) => Err(mismatch(key, "String")),
        }
    }
}

impl FromConfigValue for i64 {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Integer(i) => Ok(*i),
            ConfigValue::String(s) => s.trim().parse().map_err(|_| mismatch(key, "integer")),
            other => {
                tracing::trace!(key, found = other.type_name(), "integer expected");
                Err(mismatch(key, "integer"))
            }
        }
    }
}

impl FromConfigValue for bool {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Bool(b) => Ok(*b),
            ConfigValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(mismatch(key, "bool")),
            },
            _ => Err(mismatch(key, "bool")),
        }
    }
}

impl<T: FromConfigValue> FromConfigValue for Option<T> {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Null => Ok(None),
            v => T::from_config_value(v, key).map(Some),
        }
    }
}

/// Lists come either from a YAML sequence or from a comma-separated string
/// (the only shape an environment variable can carry).
impl<T: FromConfigValue> FromConfigValue for Vec<T> {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| T::from_config_value(v, &format!("{key}[{i}]")))
                .collect(),
            ConfigValue::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .enumerate()
                .map(|(i, part)| {
                    T::from_config_value(&ConfigValue::String(part.to_string()), &format!("{key}[{i}]"))
                })
                .collect(),
            ConfigValue::Null => Ok(Vec::new()),
            other => Ok(vec![T::from_config_value(other, key)?]),
        }
    }
}

macro_rules! impl_from_config_int {
    ($($ty:ty),+) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
                    let i = i64::from_config_value(value, key)?;
                    <$ty>::try_from(i).map_err(|_| mismatch(key, stringify!($ty)))
                }
            }
        )+
    };
}

impl_from_config_int!(u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_string_becomes_list() {
        let value = ConfigValue::String("amqp://a:5672, amqp://b:5672,,".into());
        let list: Vec<String> = Vec::from_config_value(&value, "transport.servers").unwrap();
        assert_eq!(list, vec!["amqp://a:5672", "amqp://b:5672"]);
    }

    #[test]
    fn integer_range_is_checked() {
        let value = ConfigValue::Integer(70_000);
        let err = u16::from_config_value(&value, "port").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { expected: "u16", .. }));
    }

    #[test]
    fn numeric_strings_parse_as_integers() {
        let value = ConfigValue::String(" 3000 ".into());
        assert_eq!(u16::from_config_value(&value, "port").unwrap(), 3000);
    }

    #[test]
    fn non_numeric_string_is_a_mismatch() {
        let value = ConfigValue::String("abc".into());
        assert!(u16::from_config_value(&value, "port").is_err());
    }
}
