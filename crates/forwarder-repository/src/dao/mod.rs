//! DAO (Data Access Object) layer.
//!
//! Each DAO interface covers one table of the tenant schema (or the shared
//! public schema for reference data) and extends [`CrudDao`] with the
//! lookups callers need for that table.
//!
//! Hierarchy:
//! ```text
//! Service → DAO (interface) → PgCrudDao (impl) → TenantRepository → Postgres
//! ```

pub mod airport_dao;
pub mod airway_bill_dao;
pub mod crud_dao;
pub mod r#impl;
pub mod invoice_dao;
pub mod quote_dao;
pub mod report_dao;
pub mod shipment_dao;

pub use airport_dao::*;
pub use airway_bill_dao::*;
pub use crud_dao::{CrudDao, RecordQuery};
pub use invoice_dao::*;
pub use quote_dao::*;
pub use r#impl::*;
pub use report_dao::*;
pub use shipment_dao::*;
