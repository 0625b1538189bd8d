//! Result type aliases for Forwarder.

use crate::ForwarderError;

/// A specialized `Result` type for Forwarder operations.
pub type ForwarderResult<T> = Result<T, ForwarderError>;
