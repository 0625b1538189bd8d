//! Tenant-to-table resolution.
//!
//! Every tenant owns a Postgres schema named after its [`TenantId`]; tenant
//! tables are addressed as `"<tenant>"."<table>"`. Reference tables shared
//! by all tenants live in the configured public schema instead.

use forwarder_core::{ForwarderError, ForwarderResult, TenantId};

/// Where a table lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableScope {
    /// One copy per tenant schema.
    Tenant,
    /// A single copy in the public schema.
    Public,
}

/// Quotes a Postgres identifier, doubling embedded quotes.
#[must_use]
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Builds schema-qualified, quoted table names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResolver {
    public_schema: String,
}

impl TableResolver {
    /// Creates a resolver pinned to `public_schema` for shared tables.
    pub fn new(public_schema: impl Into<String>) -> ForwarderResult<Self> {
        let public_schema = public_schema.into();
        if public_schema.is_empty()
            || !public_schema
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ForwarderError::Configuration(format!(
                "invalid public schema name '{}'",
                public_schema
            )));
        }
        Ok(Self { public_schema })
    }

    /// Returns the public schema name.
    #[must_use]
    pub fn public_schema(&self) -> &str {
        &self.public_schema
    }

    /// Resolves `table` for `tenant`.
    #[must_use]
    pub fn resolve(&self, tenant: &TenantId, table: &str, scope: TableScope) -> String {
        let schema = match scope {
            TableScope::Tenant => tenant.as_str(),
            TableScope::Public => self.public_schema.as_str(),
        };
        format!("{}.{}", quote_ident(schema), quote_ident(table))
    }
}

impl Default for TableResolver {
    fn default() -> Self {
        Self {
            public_schema: "public".to_string(),
        }
    }
}
