//! Postgres shipment, party and timeline DAOs.

use super::PgCrudDao;
use crate::dao::{
    CrudDao, ShipmentDao, ShipmentPartyDao, ShipmentPartyQuery, ShipmentQuery, TimelineEventDao, TimelineEventQuery,
};
use crate::filter::{Filter, SortDirection};
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{PartyRole, Shipment, ShipmentParty, TimelineEvent};
use uuid::Uuid;

pub type PgShipmentDao = PgCrudDao<Shipment, ShipmentQuery>;
pub type PgShipmentPartyDao = PgCrudDao<ShipmentParty, ShipmentPartyQuery>;
pub type PgTimelineEventDao = PgCrudDao<TimelineEvent, TimelineEventQuery>;

impl ShipmentDao for PgShipmentDao {}

#[async_trait]
impl ShipmentPartyDao for PgShipmentPartyDao {
    async fn get_by_role(&self, ctx: &RequestContext, shipment_id: Uuid, role: PartyRole) -> ForwarderResult<ShipmentParty> {
        let query = ShipmentPartyQuery {
            shipment_id,
            role: Some(role),
            ..ShipmentPartyQuery::default()
        };
        self.get(ctx, &query).await
    }

    async fn list_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Vec<ShipmentParty>> {
        let query = ShipmentPartyQuery {
            shipment_id,
            ..ShipmentPartyQuery::default()
        };
        self.get_all(ctx, &query).await
    }
}

#[async_trait]
impl TimelineEventDao for PgTimelineEventDao {
    async fn list_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Vec<TimelineEvent>> {
        let query = TimelineEventQuery {
            shipment_id,
            ..TimelineEventQuery::default()
        };
        self.get_all(ctx, &query).await
    }

    async fn latest_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Option<TimelineEvent>> {
        let filter = Filter::new()
            .eq("shipment_id", shipment_id)
            .order_by("occurred_at", SortDirection::Desc)
            .order_by("id", SortDirection::Desc);
        self.repository().find(ctx, &filter).await
    }
}
