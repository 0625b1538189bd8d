//! Air waybill DAOs: bill info plus its charges, routing legs and documents.

use super::{CrudDao, RecordQuery};
use crate::filter::Filter;
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{AirwayBillCharge, AirwayBillDoc, AirwayBillInfo, AirwayBillRoute};
use uuid::Uuid;

/// Filter arguments for bill info lookups.
#[derive(Debug, Clone, Default)]
pub struct AirwayBillInfoQuery {
    pub id: Uuid,
    pub ids: Vec<Uuid>,
    pub shipment_id: Uuid,
    pub awb_number: String,
    pub is_master: Option<bool>,
    pub include_deleted: bool,
}

impl RecordQuery for AirwayBillInfoQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .any_of("id", self.ids.clone())
            .eq_if("shipment_id", self.shipment_id)
            .eq_if("awb_number", self.awb_number.as_str())
            .eq_opt("is_master", self.is_master)
            .include_deleted_if(self.include_deleted)
    }
}

/// Air waybill header data access.
#[async_trait]
pub trait AirwayBillInfoDao: CrudDao<AirwayBillInfo, Query = AirwayBillInfoQuery> {
    /// The live bill carrying this waybill number, or `NotFound`.
    async fn get_by_awb_number(&self, ctx: &RequestContext, awb_number: &str) -> ForwarderResult<AirwayBillInfo>;

    /// Live bills of a shipment.
    async fn list_for_shipment(&self, ctx: &RequestContext, shipment_id: Uuid) -> ForwarderResult<Vec<AirwayBillInfo>>;
}

/// Filter arguments shared by the bill child tables.
#[derive(Debug, Clone, Default)]
pub struct BillChildQuery {
    pub id: Uuid,
    pub ids: Vec<Uuid>,
    pub bill_info_id: Uuid,
    pub bill_info_ids: Vec<Uuid>,
}

impl BillChildQuery {
    #[must_use]
    pub fn for_bill(bill_info_id: Uuid) -> Self {
        Self {
            bill_info_id,
            ..Self::default()
        }
    }
}

impl RecordQuery for BillChildQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .any_of("id", self.ids.clone())
            .eq_if("bill_info_id", self.bill_info_id)
            .any_of("bill_info_id", self.bill_info_ids.clone())
    }
}

/// Operations on rows owned by one air waybill.
#[async_trait]
pub trait BillChildDao<E: crate::record::Record>: CrudDao<E, Query = BillChildQuery> {
    /// Rows of a bill, in the table's default order.
    async fn list_for_bill(&self, ctx: &RequestContext, bill_info_id: Uuid) -> ForwarderResult<Vec<E>> {
        self.get_all(ctx, &BillChildQuery::for_bill(bill_info_id)).await
    }

    /// Deletes every row of a bill. Returns the affected count.
    async fn delete_for_bill(&self, ctx: &RequestContext, bill_info_id: Uuid) -> ForwarderResult<u64> {
        self.delete_all(ctx, &BillChildQuery::for_bill(bill_info_id)).await
    }
}

/// Charge lines of a waybill. Hard-deleted.
pub trait AirwayBillChargeDao: BillChildDao<AirwayBillCharge> {}

/// Routing legs of a waybill, ordered by leg sequence. Hard-deleted.
pub trait AirwayBillRouteDao: BillChildDao<AirwayBillRoute> {}

/// Documents of a waybill. Marked deleted, then removed.
pub trait AirwayBillDocDao: BillChildDao<AirwayBillDoc> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_lists_do_not_filter() {
        let query = BillChildQuery {
            ids: Vec::new(),
            bill_info_ids: Vec::new(),
            ..BillChildQuery::default()
        };
        assert!(query.to_filter().is_unconstrained());
    }

    #[test]
    fn test_for_bill() {
        let bill = Uuid::now_v7();
        let rendered = BillChildQuery::for_bill(bill).to_filter().to_string();
        assert_eq!(rendered, format!("bill_info_id = {}", bill));
    }

    #[test]
    fn test_master_flag_is_optional() {
        let query = AirwayBillInfoQuery {
            is_master: Some(false),
            ..AirwayBillInfoQuery::default()
        };
        assert_eq!(query.to_filter().to_string(), "is_master = false");
        assert!(AirwayBillInfoQuery::default().to_filter().is_unconstrained());
    }
}
