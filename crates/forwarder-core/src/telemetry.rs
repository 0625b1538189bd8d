//! Logging initialisation.
//!
//! Every crate logs through `tracing`; binaries call [`init_logging`] once at
//! startup to install a `tracing-subscriber` formatter.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log every SQL statement sqlx issues.
    #[serde(default)]
    pub log_statements: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            log_statements: false,
        }
    }
}

impl LoggingConfig {
    /// Builds the filter directive used when `RUST_LOG` is not set.
    ///
    /// The configured level applies to every target; `sqlx` is raised to
    /// `debug` only when statements are logged.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        if self.log_statements {
            format!("{},sqlx=debug", self.log_level)
        } else {
            format!("{},sqlx=warn", self.log_level)
        }
    }
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this
/// twice returns an error instead of panicking.
#[cfg(feature = "telemetry")]
pub fn init_logging(config: &LoggingConfig) -> crate::ForwarderResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let result = match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| crate::ForwarderError::Internal(format!("Failed to install logger: {}", e)))?;

    tracing::info!(
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Logging initialized"
    );
    Ok(())
}

/// No-op when the `telemetry` feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_logging(_config: &LoggingConfig) -> crate::ForwarderResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.log_statements);
    }

    #[test]
    fn test_filter_directive() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.filter_directive(), "info,sqlx=warn");

        config.log_level = "warn".to_string();
        assert_eq!(config.filter_directive(), "warn,sqlx=warn");

        config.log_statements = true;
        assert_eq!(config.filter_directive(), "warn,sqlx=debug");
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn test_init_logging_twice_is_an_error() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
