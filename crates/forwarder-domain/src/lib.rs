//! # Forwarder Domain
//!
//! Entities of the shipment-management data model. Each entity mirrors one
//! table row: identity, payload columns, [`Audit`](forwarder_core::Audit)
//! metadata and, for soft-deleted tables, [`SoftDelete`](forwarder_core::SoftDelete)
//! markers.
//!
//! Entities are plain data. Persistence lives in `forwarder-repository`.

pub mod entities;
pub mod enums;
pub mod reports;

pub use entities::*;
pub use enums::*;
pub use reports::*;
