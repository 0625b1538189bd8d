//! Daily status report over a tenant's shipments.

use super::RecordQuery;
use crate::filter::Filter;
use async_trait::async_trait;
use chrono::NaiveDate;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{DsrRow, ShipmentStatus};
use uuid::Uuid;

/// Filter arguments for the daily status report.
#[derive(Debug, Clone, Default)]
pub struct DsrQuery {
    pub customer_id: Uuid,
    pub shipment_ids: Vec<Uuid>,
    /// Any of these statuses. Empty means every status.
    pub statuses: Vec<ShipmentStatus>,
    /// Inclusive ETD range.
    pub etd_from: Option<NaiveDate>,
    pub etd_to: Option<NaiveDate>,
}

impl RecordQuery for DsrQuery {
    fn to_filter(&self) -> Filter {
        let statuses: Vec<String> = self.statuses.iter().map(|s| s.as_str().to_string()).collect();
        Filter::new()
            .is_null("s.deleted_at")
            .eq_if("s.customer_id", self.customer_id)
            .any_of("s.id", self.shipment_ids.clone())
            .any_of("s.status", statuses)
            .gte_opt("s.etd", self.etd_from)
            .lte_opt("s.etd", self.etd_to)
    }
}

#[async_trait]
pub trait DsrReportDao: Send + Sync {
    /// One row per live shipment with its active air waybill, latest
    /// timeline event and billed total. Ordered by ETD, undated last.
    async fn daily_status_report(&self, ctx: &RequestContext, query: &DsrQuery) -> ForwarderResult<Vec<DsrRow>>;
}
