//! Postgres daily status report.

use crate::dao::{DsrQuery, DsrReportDao, RecordQuery};
use crate::filter::Filter;
use crate::pool::DatabasePoolInterface;
use crate::record::Record;
use crate::repository::storage_error;
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{AirwayBillInfo, DsrRow, Invoice, InvoiceStatus, Shipment, TimelineEvent};
use sqlx::{Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// Builds the report from the tenant's shipment, bill, timeline and
/// invoice tables.
#[derive(Clone)]
pub struct PgDsrReportDao {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgDsrReportDao {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    fn table<E: Record>(&self, ctx: &RequestContext) -> String {
        self.pool.tables().resolve(ctx.tenant(), E::TABLE, E::SCOPE)
    }

    fn report_query(&self, ctx: &RequestContext, filter: &Filter) -> QueryBuilder<'static, Postgres> {
        dsr_query(
            &self.table::<Shipment>(ctx),
            &self.table::<AirwayBillInfo>(ctx),
            &self.table::<TimelineEvent>(ctx),
            &self.table::<Invoice>(ctx),
            filter,
        )
    }
}

impl std::fmt::Debug for PgDsrReportDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgDsrReportDao").finish_non_exhaustive()
    }
}

/// The bill shown is the master bill when there is one, else the oldest
/// house bill.
fn dsr_query(
    shipments: &str,
    bills: &str,
    events: &str,
    invoices: &str,
    filter: &Filter,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(
        "SELECT s.id AS shipment_id, s.reference, s.customer_id, s.mode, s.status, \
         s.origin, s.destination, s.etd, s.eta, \
         b.awb_number, b.pieces, b.chargeable_weight_kg, \
         e.event_code AS last_event_code, e.location AS last_event_location, \
         e.occurred_at AS last_event_at, \
         COALESCE(i.total, 0) AS invoiced_total, COALESCE(i.cnt, 0) AS invoice_count FROM ",
    );
    qb.push(shipments)
        .push(" s LEFT JOIN LATERAL (SELECT awb_number, pieces, chargeable_weight_kg FROM ")
        .push(bills)
        .push(
            " WHERE shipment_id = s.id AND deleted_at IS NULL \
             ORDER BY is_master DESC, created_at, id LIMIT 1) b ON TRUE",
        )
        .push(" LEFT JOIN LATERAL (SELECT event_code, location, occurred_at FROM ")
        .push(events)
        .push(" WHERE shipment_id = s.id ORDER BY occurred_at DESC, id DESC LIMIT 1) e ON TRUE")
        .push(" LEFT JOIN LATERAL (SELECT SUM(total_amount) AS total, COUNT(*) AS cnt FROM ")
        .push(invoices)
        .push(" WHERE shipment_id = s.id AND deleted_at IS NULL AND status <> ")
        .push_bind(InvoiceStatus::Void.as_str())
        .push(") i ON TRUE");
    filter.push_where(&mut qb, None);
    qb.push(" ORDER BY s.etd NULLS LAST, s.reference");
    qb
}

#[async_trait]
impl DsrReportDao for PgDsrReportDao {
    async fn daily_status_report(&self, ctx: &RequestContext, query: &DsrQuery) -> ForwarderResult<Vec<DsrRow>> {
        let filter = query.to_filter();
        let table = self.table::<Shipment>(ctx);
        debug!(tenant = %ctx.tenant(), table = %table, filter = %filter, "Building daily status report");

        let mut qb = self.report_query(ctx, &filter);
        qb.build_query_as::<DsrRow>()
            .fetch_all(self.pool.inner())
            .await
            .map_err(|e| storage_error(ctx, &table, "daily_status_report", e))
    }
}
