//! Postgres DAO implementations.

mod airport_dao_impl;
mod airway_bill_dao_impl;
mod crud_dao_impl;
mod invoice_dao_impl;
mod quote_dao_impl;
mod report_dao_impl;
mod shipment_dao_impl;

pub use airport_dao_impl::*;
pub use airway_bill_dao_impl::*;
pub use crud_dao_impl::PgCrudDao;
pub use invoice_dao_impl::*;
pub use quote_dao_impl::*;
pub use report_dao_impl::PgDsrReportDao;
pub use shipment_dao_impl::*;
