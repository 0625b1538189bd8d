//! # Forwarder Admin Library
//!
//! Startup helpers for the `forwarder-admin` operator binary, which prepares
//! a database for the data access layer: public migrations first, then one
//! schema per tenant.

pub mod startup;
