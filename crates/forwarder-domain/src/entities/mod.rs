//! Domain entities.
//!
//! UUID-keyed entities are created with a nil id; the repository assigns a
//! time-ordered UUIDv7 on first upsert.

mod airport;
mod airway_bill;
mod invoice;
mod party;
mod quote;
mod shipment;
mod timeline;

pub use airport::*;
pub use airway_bill::*;
pub use invoice::*;
pub use party::*;
pub use quote::*;
pub use shipment::*;
pub use timeline::*;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

/// Replaces a nil id with a fresh UUIDv7. Returns true when it did.
pub(crate) fn assign_if_nil(id: &mut Uuid) -> bool {
    if id.is_nil() {
        *id = Uuid::now_v7();
        true
    } else {
        false
    }
}

/// Monetary amounts and weights are never negative.
pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Exchange rates, quantities and chargeable weights are strictly positive.
pub(crate) fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        return Err(ValidationError::new("positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_if_nil_only_once() {
        let mut id = Uuid::nil();
        assert!(assign_if_nil(&mut id));
        let first = id;
        assert!(!assign_if_nil(&mut id));
        assert_eq!(id, first);
    }

    #[test]
    fn test_decimal_rules() {
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::new(-1, 2)).is_err());
        assert!(positive(&Decimal::ZERO).is_err());
        assert!(positive(&Decimal::new(125, 2)).is_ok());
    }
}
