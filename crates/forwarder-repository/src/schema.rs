//! Tenant schema DDL.

use crate::tenant::quote_ident;
use forwarder_core::TenantId;

const TENANT_SCHEMA_TEMPLATE: &str = include_str!("../sql/tenant_schema.sql");

/// Tables every tenant schema holds, in creation order.
pub const TENANT_TABLES: &[&str] = &[
    "shipment",
    "airway_bill_info",
    "airway_bill_charge",
    "airway_bill_route",
    "airway_bill_doc",
    "invoice",
    "invoice_line_item",
    "line_item_exchange_rate",
    "invoice_sequence",
    "rfq",
    "quote",
    "shipment_party",
    "timeline_event",
];

/// Renders the idempotent DDL creating `tenant`'s schema and tables.
///
/// The tenant id has already been validated to schema-name characters;
/// it is quoted here so ids containing `-` stay single identifiers.
#[must_use]
pub fn tenant_ddl(tenant: &TenantId) -> String {
    TENANT_SCHEMA_TEMPLATE.replace("{schema}", &quote_ident(tenant.as_str()))
}
