//! Unified error types for the data access layer.

use std::fmt::Debug;
use thiserror::Error;

/// PostgreSQL SQLSTATE for `unique_violation`.
pub const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `check_violation`.
pub const PG_CHECK_VIOLATION: &str = "23514";

/// Unified error type for the Forwarder data access layer.
///
/// Storage failures surface unchanged in meaning: a missing row is
/// [`ForwarderError::NotFound`], constraint violations keep their own
/// variants, and everything else the driver reports is
/// [`ForwarderError::Database`].
#[derive(Error, Debug)]
pub enum ForwarderError {
    // ============ Lookup Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Constraint Errors ============
    /// Unique constraint violated (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Foreign key constraint violated
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    // ============ Tenancy Errors ============
    /// The tenant identifier cannot name a schema
    #[error("Invalid tenant: {0}")]
    InvalidTenant(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForwarderError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::ForeignKey(_) => "FOREIGN_KEY_VIOLATION",
            Self::InvalidTenant(_) => "INVALID_TENANT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true for lookups that matched no row.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Checks if this error is retriable.
    ///
    /// Informational only; the data access layer itself never retries.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ForwarderError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => Self::Conflict(db_err.message().to_string()),
                Some(PG_FOREIGN_KEY_VIOLATION) => Self::ForeignKey(db_err.message().to_string()),
                Some(PG_CHECK_VIOLATION) => Self::Validation(db_err.message().to_string()),
                _ => Self::Database(err.to_string()),
            },
            _ => Self::Database(err.to_string()),
        }
    }
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}
