//! Admin startup utilities.

use forwarder_config::AppConfig;
use forwarder_core::{ForwarderResult, TenantId};
use forwarder_repository::DatabasePoolInterface;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    ______                                __
   / ____/___  ______      ______ _______/ /__  _____
  / /_  / __ \/ ___/ | /| / / __ `/ ___/ __  / _ \/ ___/
 / __/ / /_/ / /   | |/ |/ / /_/ / /  / /_/ /  __/ /
/_/    \____/_/    |__/|__/\__,_/_/   \__,_/\___/_/

                         Admin
    "#
    );
}

/// Prints what the run is about to do.
pub fn print_startup_info(config: &AppConfig, tenants: &[TenantId]) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment:    {}", config.app.environment);
    info!("Public schema:  {}", config.tenancy.public_schema);
    info!("Tenants:        {}", tenants.len());
    info!("{}", separator);
}

/// Parses the configured tenants followed by any extra ones, dropping
/// duplicates while keeping first-seen order.
///
/// Fails on the first id that cannot name a schema.
pub fn tenants_to_provision<I, S>(configured: &[String], extra: I) -> ForwarderResult<Vec<TenantId>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tenants: Vec<TenantId> = Vec::new();
    let extra: Vec<S> = extra.into_iter().collect();
    for raw in configured.iter().map(String::as_str).chain(extra.iter().map(AsRef::as_ref)) {
        let tenant = TenantId::parse(raw)?;
        if !tenants.contains(&tenant) {
            tenants.push(tenant);
        }
    }
    Ok(tenants)
}

/// Provisions every tenant in order, stopping at the first failure.
pub async fn provision_tenants(pool: &dyn DatabasePoolInterface, tenants: &[TenantId]) -> ForwarderResult<()> {
    for tenant in tenants {
        pool.provision_tenant(tenant).await?;
        info!(tenant = %tenant, "Tenant schema ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forwarder_core::ForwarderError;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let tenants = tenants_to_provision(&["acme".to_string()], Vec::<String>::new()).unwrap();
        print_startup_info(&AppConfig::default(), &tenants);
    }

    #[test]
    fn test_tenants_are_deduplicated_in_order() {
        let configured = vec!["acme".to_string(), "globex".to_string()];
        let tenants = tenants_to_provision(&configured, ["ACME", "initech"]).unwrap();
        let names: Vec<&str> = tenants.iter().map(TenantId::as_str).collect();
        assert_eq!(names, ["acme", "globex", "initech"]);
    }

    #[test]
    fn test_invalid_tenant_fails() {
        let err = tenants_to_provision(&[], ["bad;name"]).unwrap_err();
        assert!(matches!(err, ForwarderError::InvalidTenant(_)));
    }

    #[test]
    fn test_no_tenants() {
        assert!(tenants_to_provision(&[], Vec::<String>::new()).unwrap().is_empty());
    }
}
