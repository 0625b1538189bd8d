//! # Forwarder Admin
//!
//! Prepares a Postgres database for the data access layer:
//!
//! 1. applies the versioned public-schema migrations
//! 2. provisions one schema per tenant, from `tenancy.tenants` plus any
//!    tenant ids given on the command line
//!
//! ```text
//! forwarder-admin [TENANT_ID ...]
//! ```

use forwarder_config::ConfigLoader;
use forwarder_core::{init_logging, ForwarderResult};
use forwarder_repository::create_pool;
use forwarder_admin::startup::{print_banner, print_startup_info, provision_tenants, tenants_to_provision};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Admin run failed: {}", e);
        eprintln!("forwarder-admin: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> ForwarderResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_logging(&config.observability)?;
    print_banner();
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let tenants = tenants_to_provision(&config.tenancy.tenants, std::env::args().skip(1))?;
    print_startup_info(&config, &tenants);

    let db_pool = create_pool(&config.database, &config.tenancy).await?;

    let result = async {
        db_pool.health_check().await?;
        db_pool.run_migrations().await?;
        provision_tenants(db_pool.as_ref(), &tenants).await
    }
    .await;

    db_pool.close().await;
    result?;

    info!(tenants = tenants.len(), "Database ready");
    Ok(())
}
