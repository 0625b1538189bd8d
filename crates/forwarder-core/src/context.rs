//! Request-scoped context handed to every DAO call.
//!
//! The upstream handler authenticates the caller and resolves the tenant;
//! the data access layer only reads the values carried here.

use crate::{ForwarderError, ForwarderResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use uuid::Uuid;

/// Maximum identifier length accepted by Postgres.
const MAX_SCHEMA_NAME_LEN: usize = 63;

/// Schemas a tenant may never be mapped onto.
const RESERVED_SCHEMAS: &[&str] = &["public", "information_schema"];

/// A validated tenant identifier, usable verbatim as a schema name.
///
/// Tenant identifiers are lower-cased on parse. Only ASCII letters, digits,
/// `_` and `-` are accepted, and the `pg_` prefix is reserved by Postgres.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Parses and validates a tenant identifier.
    pub fn parse(raw: &str) -> ForwarderResult<Self> {
        let value = raw.trim().to_ascii_lowercase();

        if value.is_empty() {
            return Err(ForwarderError::InvalidTenant("tenant id is empty".to_string()));
        }
        if value.len() > MAX_SCHEMA_NAME_LEN {
            return Err(ForwarderError::InvalidTenant(format!(
                "tenant id '{}' exceeds {} characters",
                value, MAX_SCHEMA_NAME_LEN
            )));
        }
        if let Some(bad) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ForwarderError::InvalidTenant(format!(
                "tenant id '{}' contains '{}'",
                value, bad
            )));
        }
        if value.starts_with("pg_") || RESERVED_SCHEMAS.contains(&value.as_str()) {
            return Err(ForwarderError::InvalidTenant(format!(
                "tenant id '{}' is reserved",
                value
            )));
        }

        Ok(Self(value))
    }

    /// Returns the tenant identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = ForwarderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = ForwarderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

/// Request-scoped values every DAO call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    tenant: TenantId,
    account_id: Option<Uuid>,
    request_id: Uuid,
}

impl RequestContext {
    /// Creates a context for an authenticated account.
    #[must_use]
    pub fn new(tenant: TenantId, account_id: Uuid) -> Self {
        Self {
            tenant,
            account_id: Some(account_id),
            request_id: Uuid::now_v7(),
        }
    }

    /// Creates a context for background work with no acting account.
    #[must_use]
    pub fn system(tenant: TenantId) -> Self {
        Self {
            tenant,
            account_id: None,
            request_id: Uuid::now_v7(),
        }
    }

    /// Overrides the generated request id with the caller's correlation id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the tenant the request is scoped to.
    #[must_use]
    pub const fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Returns the acting account, if any. Stamped into audit columns.
    #[must_use]
    pub const fn actor(&self) -> Option<Uuid> {
        self.account_id
    }

    /// Returns the correlation id used in log events.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }
}
