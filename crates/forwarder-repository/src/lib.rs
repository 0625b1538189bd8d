//! # Forwarder Repository
//!
//! Tenant-scoped data access over Postgres:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ShipmentDao>, Arc<dyn InvoiceSequenceDao>, …  (DAO interfaces)
//! PgCrudDao<E, Q>                (DAO impl, one generic type for every table)
//!   ↓
//! TenantRepository<E>            (statement building, audit stamping, errors)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! Postgres  "<tenant>".<table>  /  "public".airport
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   tenant.rs          ← schema-qualified table names
//!   filter.rs          ← conditional WHERE / ORDER BY / LIMIT builder
//!   record.rs          ← Record trait: table metadata per entity
//!   records.rs         ← Record impls for the domain entities
//!   repository.rs      ← TenantRepository<E>
//!   schema.rs          ← tenant schema DDL
//!   pool.rs            ← DatabasePool, migrations, tenant provisioning
//!   dao/
//!     crud_dao.rs      ← CrudDao trait
//!     *_dao.rs         ← per-table DAO traits and query structs
//!     impl/postgres/   ← Pg* implementations
//! ```

pub mod dao;
pub mod filter;
pub mod pool;
pub mod record;
mod records;
pub mod repository;
pub mod schema;
pub mod tenant;

pub use dao::*;
pub use filter::{Filter, FilterValue, SortDirection};
pub use pool::*;
pub use record::{DeletePolicy, Record, RecordId};
pub use repository::TenantRepository;
pub use tenant::{TableResolver, TableScope};
