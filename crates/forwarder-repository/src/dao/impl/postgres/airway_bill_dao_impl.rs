//! Postgres air waybill DAOs.

use super::PgCrudDao;
use crate::dao::{
    AirwayBillChargeDao, AirwayBillDocDao, AirwayBillInfoDao, AirwayBillInfoQuery, AirwayBillRouteDao, BillChildDao,
    BillChildQuery, CrudDao,
};
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{AirwayBillCharge, AirwayBillDoc, AirwayBillInfo, AirwayBillRoute};
use uuid::Uuid;

pub type PgAirwayBillInfoDao = PgCrudDao<AirwayBillInfo, AirwayBillInfoQuery>;
pub type PgAirwayBillChargeDao = PgCrudDao<AirwayBillCharge, BillChildQuery>;
pub type PgAirwayBillRouteDao = PgCrudDao<AirwayBillRoute, BillChildQuery>;
pub type PgAirwayBillDocDao = PgCrudDao<AirwayBillDoc, BillChildQuery>;

#[async_trait]
impl AirwayBillInfoDao for PgAirwayBillInfoDao {
    async fn get_by_awb_number(&self, ctx: &RequestContext, awb_number: &str) -> ForwarderResult<AirwayBillInfo> {
        let query = AirwayBillInfoQuery {
            awb_number: awb_number.to_string(),
            ..AirwayBillInfoQuery::default()
        };
        self.get(ctx, &query).await
    }

    async fn list_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Vec<AirwayBillInfo>> {
        let query = AirwayBillInfoQuery {
            shipment_id,
            ..AirwayBillInfoQuery::default()
        };
        self.get_all(ctx, &query).await
    }
}

impl BillChildDao<AirwayBillCharge> for PgAirwayBillChargeDao {}
impl AirwayBillChargeDao for PgAirwayBillChargeDao {}

impl BillChildDao<AirwayBillRoute> for PgAirwayBillRouteDao {}
impl AirwayBillRouteDao for PgAirwayBillRouteDao {}

impl BillChildDao<AirwayBillDoc> for PgAirwayBillDocDao {}
impl AirwayBillDocDao for PgAirwayBillDocDao {}
