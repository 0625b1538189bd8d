//! Shipment entity.

use super::assign_if_nil;
use crate::{ShipmentMode, ShipmentStatus};
use chrono::NaiveDate;
use forwarder_core::{rules, Audit, Auditable, Entity, SoftDelete};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A consignment moved for a customer, the parent of bills, parties and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Shipment {
    /// Unique identifier (nil until first persisted).
    pub id: Uuid,

    /// Human-facing booking reference, unique per tenant.
    #[validate(length(min = 1, max = 32), custom(function = "rules::not_blank"))]
    pub reference: String,

    /// Customer account the shipment is booked for.
    pub customer_id: Uuid,

    /// Transport mode.
    #[sqlx(try_from = "String")]
    pub mode: ShipmentMode,

    /// Current status.
    #[sqlx(try_from = "String")]
    pub status: ShipmentStatus,

    /// Origin location code (IATA or UN/LOCODE).
    #[validate(length(min = 3, max = 5))]
    pub origin: String,

    /// Destination location code (IATA or UN/LOCODE).
    #[validate(length(min = 3, max = 5))]
    pub destination: String,

    /// Estimated time of departure.
    pub etd: Option<NaiveDate>,

    /// Estimated time of arrival.
    pub eta: Option<NaiveDate>,

    /// Creation and modification metadata.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,

    /// Soft-delete markers.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deletion: SoftDelete,
}

impl Shipment {
    /// Creates an unsaved, booked shipment.
    #[must_use]
    pub fn new(
        reference: impl Into<String>,
        customer_id: Uuid,
        mode: ShipmentMode,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            reference: reference.into(),
            customer_id,
            mode,
            status: ShipmentStatus::Booked,
            origin: origin.into(),
            destination: destination.into(),
            etd: None,
            eta: None,
            audit: Audit::default(),
            deletion: SoftDelete::default(),
        }
    }

    /// Sets the schedule.
    #[must_use]
    pub fn with_schedule(mut self, etd: Option<NaiveDate>, eta: Option<NaiveDate>) -> Self {
        self.etd = etd;
        self.eta = eta;
        self
    }
}

impl Entity for Shipment {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for Shipment {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}
