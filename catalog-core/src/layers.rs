use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{ConfigError, ConfigValue, FromConfigValue};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromConfigValue for LogFormat {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        let raw = String::from_config_value(value, key)?;
        match raw.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: "pretty | json",
            }),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info,tower_http=debug`.
/// Calling this twice is a no-op.
pub fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let result = match format {
        LogFormat::Json => Registry::default()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false),
            )
            .try_init(),
        LogFormat::Pretty => Registry::default()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Request tracing layer used by the HTTP tunnel.
pub fn default_trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
