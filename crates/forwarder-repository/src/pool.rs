//! Database connection pool management.

use crate::schema;
use crate::tenant::{quote_ident, TableResolver};
use async_trait::async_trait;
use forwarder_config::{DatabaseConfig, TenancyConfig};
use forwarder_core::{ForwarderError, ForwarderResult, TenantId};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Connection;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Interface for database pool operations.
///
/// DAOs hold an `Arc<dyn DatabasePoolInterface>` so tests and callers can
/// share one pool across every tenant.
#[async_trait]
pub trait DatabasePoolInterface: Send + Sync {
    /// Returns a reference to the underlying Postgres pool.
    fn inner(&self) -> &PgPool;

    /// Returns the resolver for schema-qualified table names.
    fn tables(&self) -> &TableResolver;

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> ForwarderResult<()>;

    /// Applies the versioned migrations inside the configured public schema,
    /// creating the schema first.
    async fn run_migrations(&self) -> ForwarderResult<()>;

    /// Creates the tenant's schema and tables if they do not exist.
    async fn provision_tenant(&self, tenant: &TenantId) -> ForwarderResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
pub struct DatabasePool {
    pool: PgPool,
    tables: TableResolver,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn new(config: &DatabaseConfig, tenancy: &TenancyConfig) -> ForwarderResult<Self> {
        info!("Connecting to Postgres database...");

        let mut options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| ForwarderError::Configuration(format!("Invalid database url: {}", e)))?;
        if config.statement_timeout_ms > 0 {
            options = options.options([("statement_timeout", config.statement_timeout_ms.to_string())]);
        }

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect_with(options)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                ForwarderError::Database(format!("Failed to connect: {}", e))
            })?;

        info!("Postgres connection pool established");
        Ok(Self::with_pool(pool, TableResolver::new(tenancy.public_schema.clone())?))
    }

    /// Creates DatabasePool with a pre-existing pool.
    #[must_use]
    pub fn with_pool(pool: PgPool, tables: TableResolver) -> Self {
        Self { pool, tables }
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &PgPool {
        &self.pool
    }

    fn tables(&self) -> &TableResolver {
        &self.tables
    }

    async fn health_check(&self) -> ForwarderResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ForwarderError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn run_migrations(&self) -> ForwarderResult<()> {
        let schema = quote_ident(self.tables.public_schema());
        info!(schema = %schema, "Running database migrations...");

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| ForwarderError::Database(format!("Migration failed: {}", e)))?;

        // Migrations name their tables unqualified; they land in the first
        // schema of the search path.
        let setup = format!("CREATE SCHEMA IF NOT EXISTS {schema}; SET search_path TO {schema}");
        let result = match sqlx::Executor::execute(&mut *conn, sqlx::raw_sql(&setup)).await {
            Ok(_) => sqlx::migrate!("../../migrations")
                .run_direct(&mut *conn)
                .await
                .map_err(|e| ForwarderError::Database(format!("Migration failed: {}", e))),
            Err(e) => Err(ForwarderError::Database(format!("Migration failed: {}", e))),
        };

        // The session search path must not leak back into the pool.
        if let Err(e) = conn.detach().close().await {
            warn!("Failed to close migration connection: {}", e);
        }

        result?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn provision_tenant(&self, tenant: &TenantId) -> ForwarderResult<()> {
        info!(tenant = %tenant, "Provisioning tenant schema");
        sqlx::raw_sql(&schema::tenant_ddl(tenant))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                ForwarderError::Database(format!("Provisioning tenant '{}' failed: {}", tenant, e))
            })?;
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .field("public_schema", &self.tables.public_schema())
            .finish()
    }
}

/// Creates a shared database pool.
pub async fn create_pool(
    config: &DatabaseConfig,
    tenancy: &TenancyConfig,
) -> ForwarderResult<Arc<dyn DatabasePoolInterface>> {
    let pool = DatabasePool::new(config, tenancy).await?;
    Ok(Arc::new(pool))
}
