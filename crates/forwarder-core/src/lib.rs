//! # Forwarder Core
//!
//! Core types, traits, and error definitions shared by every layer of the
//! Forwarder data access layer: the request-scoped tenant context, audit
//! metadata stamped on writes, pagination, and logging initialisation.

pub mod audit;
pub mod context;
pub mod error;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use audit::*;
pub use context::*;
pub use error::*;
pub use pagination::*;
pub use result::*;
pub use telemetry::{init_logging, LogFormat, LoggingConfig};
pub use traits::*;
pub use validation::*;
