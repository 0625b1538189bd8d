//! Shipment, shipment party and timeline event DAOs.

use super::{CrudDao, RecordQuery};
use crate::filter::Filter;
use async_trait::async_trait;
use chrono::NaiveDate;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{PartyRole, Shipment, ShipmentMode, ShipmentParty, ShipmentStatus, TimelineEvent};
use uuid::Uuid;

/// Filter arguments for shipment lookups.
#[derive(Debug, Clone, Default)]
pub struct ShipmentQuery {
    pub id: Uuid,
    pub ids: Vec<Uuid>,
    pub reference: String,
    pub customer_id: Uuid,
    pub status: Option<ShipmentStatus>,
    pub mode: Option<ShipmentMode>,
    /// Inclusive ETD range.
    pub etd_from: Option<NaiveDate>,
    pub etd_to: Option<NaiveDate>,
    pub include_deleted: bool,
}

impl ShipmentQuery {
    #[must_use]
    pub fn by_id(id: Uuid) -> Self {
        Self { id, ..Self::default() }
    }

    #[must_use]
    pub fn by_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }
}

impl RecordQuery for ShipmentQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .any_of("id", self.ids.clone())
            .eq_if("reference", self.reference.as_str())
            .eq_if("customer_id", self.customer_id)
            .eq_opt("status", self.status.map(|s| s.as_str()))
            .eq_opt("mode", self.mode.map(|m| m.as_str()))
            .gte_opt("etd", self.etd_from)
            .lte_opt("etd", self.etd_to)
            .include_deleted_if(self.include_deleted)
    }
}

/// Shipment data access.
pub trait ShipmentDao: CrudDao<Shipment, Query = ShipmentQuery> {}

/// Filter arguments for shipment party lookups.
#[derive(Debug, Clone, Default)]
pub struct ShipmentPartyQuery {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub shipment_ids: Vec<Uuid>,
    pub role: Option<PartyRole>,
}

impl RecordQuery for ShipmentPartyQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .eq_if("shipment_id", self.shipment_id)
            .any_of("shipment_id", self.shipment_ids.clone())
            .eq_opt("role", self.role.map(|r| r.as_str()))
    }
}

/// Shipment party data access.
///
/// Parties are unique per `(shipment_id, role)`: upserting a party for a
/// role that is already filled replaces the existing row in place.
#[async_trait]
pub trait ShipmentPartyDao: CrudDao<ShipmentParty, Query = ShipmentPartyQuery> {
    /// The party holding `role` on a shipment, or `NotFound`.
    async fn get_by_role(&self, ctx: &RequestContext, shipment_id: Uuid, role: PartyRole) -> ForwarderResult<ShipmentParty>;

    /// Every party on a shipment.
    async fn list_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Vec<ShipmentParty>>;
}

/// Filter arguments for timeline lookups.
#[derive(Debug, Clone, Default)]
pub struct TimelineEventQuery {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub event_code: String,
    pub occurred_from: Option<chrono::DateTime<chrono::Utc>>,
    pub occurred_to: Option<chrono::DateTime<chrono::Utc>>,
}

impl RecordQuery for TimelineEventQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .eq_if("shipment_id", self.shipment_id)
            .eq_if("event_code", self.event_code.as_str())
            .gte_opt("occurred_at", self.occurred_from)
            .lte_opt("occurred_at", self.occurred_to)
    }
}

/// Timeline event data access.
#[async_trait]
pub trait TimelineEventDao: CrudDao<TimelineEvent, Query = TimelineEventQuery> {
    /// A shipment's events, oldest first.
    async fn list_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Vec<TimelineEvent>>;

    /// A shipment's most recent event, if it has any.
    async fn latest_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Option<TimelineEvent>>;
}
