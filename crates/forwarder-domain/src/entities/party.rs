//! Parties named on a shipment.

use super::assign_if_nil;
use crate::PartyRole;
use forwarder_core::{rules, Audit, Auditable, Entity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A shipper, consignee, notify party, agent or carrier on a shipment.
///
/// A shipment holds at most one party per role; upserting a second party
/// for the same role replaces the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct ShipmentParty {
    pub id: Uuid,

    pub shipment_id: Uuid,

    #[sqlx(try_from = "String")]
    pub role: PartyRole,

    #[validate(length(min = 1, max = 128), custom(function = "rules::not_blank"))]
    pub name: String,

    #[validate(length(max = 512))]
    pub address: Option<String>,

    #[validate(email)]
    pub contact_email: Option<String>,

    #[validate(length(max = 32))]
    pub contact_phone: Option<String>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl ShipmentParty {
    /// Creates an unsaved party.
    #[must_use]
    pub fn new(shipment_id: Uuid, role: PartyRole, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            shipment_id,
            role,
            name: name.into(),
            address: None,
            contact_email: None,
            contact_phone: None,
            audit: Audit::default(),
        }
    }

    /// Sets contact details.
    #[must_use]
    pub fn with_contact(mut self, email: Option<String>, phone: Option<String>) -> Self {
        self.contact_email = email;
        self.contact_phone = phone;
        self
    }
}

impl Entity for ShipmentParty {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for ShipmentParty {
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
    fn test_contact_email_checked() {
        let party = ShipmentParty::new(Uuid::now_v7(), PartyRole::Consignee, "Northwind Imports")
            .with_contact(Some("ops@northwind.example".to_string()), None);
        assert!(party.validate().is_ok());

        let party = party.with_contact(Some("not-an-email".to_string()), None);
        assert!(party.validate().unwrap_err().field_errors().contains_key("contact_email"));
    }
}
