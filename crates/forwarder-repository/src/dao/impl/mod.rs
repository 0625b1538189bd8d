//! DAO implementations.
//!
//! Trait definitions live in the parent `dao/` module (e.g. `shipment_dao.rs`).
//! Implementations are organized by storage technology.

pub mod postgres;

pub use postgres::*;
