//! Configuration validation.
//!
//! Collects every problem in one pass so an operator sees the full list
//! instead of fixing one value per restart.

use crate::AppConfig;
use forwarder_core::TenantId;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// A schema or tenant name is unusable.
    InvalidSchemaName { name: String, message: String },
    /// Invoice number width out of range.
    InvalidInvoiceWidth { value: u32, minimum: u32, maximum: u32 },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidSchemaName { name, message } => {
                write!(f, "Invalid schema name '{}': {}", name, message)
            }
            Self::InvalidInvoiceWidth { value, minimum, maximum } => {
                write!(
                    f,
                    "Invalid invoice number width: {} (must be between {} and {})",
                    value, minimum, maximum
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];
    /// Bounds for the numeric part of invoice numbers.
    const MIN_INVOICE_WIDTH: u32 = 1;
    const MAX_INVOICE_WIDTH: u32 = 18;

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_database(&config.database, &mut errors);
        Self::validate_tenancy(&config.tenancy, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        match Url::parse(&config.url) {
            Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: format!("unsupported scheme '{}', expected postgres://", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: e.to_string(),
            }),
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_tenancy(config: &crate::TenancyConfig, errors: &mut Vec<ConfigValidationError>) {
        let schema = &config.public_schema;
        if schema.is_empty()
            || !schema.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            errors.push(ConfigValidationError::InvalidSchemaName {
                name: schema.clone(),
                message: "public schema must be lowercase letters, digits and '_'".to_string(),
            });
        }

        for tenant in &config.tenants {
            if let Err(e) = TenantId::parse(tenant) {
                errors.push(ConfigValidationError::InvalidSchemaName {
                    name: tenant.clone(),
                    message: e.to_string(),
                });
            }
        }

        if !(Self::MIN_INVOICE_WIDTH..=Self::MAX_INVOICE_WIDTH).contains(&config.invoice_number_width) {
            errors.push(ConfigValidationError::InvalidInvoiceWidth {
                value: config.invoice_number_width,
                minimum: Self::MIN_INVOICE_WIDTH,
                maximum: Self::MAX_INVOICE_WIDTH,
            });
        }
    }

    fn validate_observability(
        config: &forwarder_core::LoggingConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_mysql_url_rejected() {
        let mut config = AppConfig::default();
        config.database.url = "mysql://root@localhost/forwarder".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(&errors[0], ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "database"));
    }

    #[test]
    fn test_pool_size_errors() {
        let mut config = AppConfig::default();
        config.database.min_connections = 50;
        config.database.max_connections = 2000;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigValidationError::InvalidPoolSize { min: 50, max: 2000 }));
        assert!(errors.contains(&ConfigValidationError::PoolSizeTooLarge { value: 2000, maximum: 1000 }));
    }

    #[test]
    fn test_invalid_tenants_reported_individually() {
        let mut config = AppConfig::default();
        config.tenancy.tenants = vec!["acme".to_string(), "bad tenant".to_string(), "public".to_string()];

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_invoice_width_bounds() {
        let mut config = AppConfig::default();
        config.tenancy.invoice_number_width = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        config.tenancy.invoice_number_width = 18;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = AppConfig::default();
        config.observability.log_level = "DEBUG".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());

        config.observability.log_level = "verbose".to_string();
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors[0].to_string(), "Invalid log level: 'verbose' (valid: trace, debug, info, warn, error)");
    }

    #[test]
    fn test_format_validation_errors() {
        let errors = vec![ConfigValidationError::NonPositiveTimeout {
            name: "database.idle_timeout_secs".to_string(),
            value: 0,
        }];
        let text = format_validation_errors(&errors);
        assert!(text.starts_with("Configuration validation failed:"));
        assert!(text.contains("1. Timeout 'database.idle_timeout_secs'"));
    }
}
