//! Airport reference data, shared by all tenants.

use forwarder_core::{rules, Audit, Auditable, Entity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An airport keyed by its IATA code.
///
/// Lives in the public schema. The code is the identity, so there is
/// nothing to generate on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Airport {
    #[validate(custom(function = "rules::iata_code"))]
    pub code: String,

    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(custom(function = "rules::country_code"))]
    pub country_code: String,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl Airport {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            city: city.into(),
            country_code: country_code.into(),
            audit: Audit::default(),
        }
    }
}

impl Entity for Airport {
    type Id = String;

    fn id(&self) -> &String {
        &self.code
    }

    fn ensure_id(&mut self) -> bool {
        false
    }
}

impl Auditable for Airport {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_validation() {
        assert!(Airport::new("SIN", "Changi", "Singapore", "SG").validate().is_ok());

        let errors = Airport::new("SINX", "Changi", "Singapore", "sgp").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("code"));
        assert!(fields.contains_key("country_code"));
    }

    #[test]
    fn test_code_is_identity() {
        let mut airport = Airport::new("HKG", "Hong Kong International", "Hong Kong", "HK");
        assert!(!airport.ensure_id());
        assert_eq!(airport.id(), "HKG");
    }
}
