//! Request-for-quotation and quote DAOs.

use super::{CrudDao, RecordQuery};
use crate::filter::Filter;
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{Quote, QuoteStatus, Rfq, RfqStatus, ShipmentMode};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct RfqQuery {
    pub id: Uuid,
    pub ids: Vec<Uuid>,
    pub customer_id: Uuid,
    pub mode: Option<ShipmentMode>,
    pub status: Option<RfqStatus>,
    pub include_deleted: bool,
}

impl RecordQuery for RfqQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .any_of("id", self.ids.clone())
            .eq_if("customer_id", self.customer_id)
            .eq_opt("mode", self.mode.map(|m| m.as_str()))
            .eq_opt("status", self.status.map(|s| s.as_str()))
            .include_deleted_if(self.include_deleted)
    }
}

/// Request-for-quotation data access.
#[async_trait]
pub trait RfqDao: CrudDao<Rfq, Query = RfqQuery> {
    /// A customer's live requests, newest first, optionally in one status.
    async fn list_for_customer(
        &self,
        ctx: &RequestContext,
        customer_id: Uuid,
        status: Option<RfqStatus>,
    ) -> ForwarderResult<Vec<Rfq>>;
}

#[derive(Debug, Clone, Default)]
pub struct QuoteQuery {
    pub id: Uuid,
    pub ids: Vec<Uuid>,
    pub rfq_id: Uuid,
    pub customer_id: Uuid,
    pub quote_number: String,
    pub status: Option<QuoteStatus>,
    pub include_deleted: bool,
}

impl RecordQuery for QuoteQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .any_of("id", self.ids.clone())
            .eq_if("rfq_id", self.rfq_id)
            .eq_if("customer_id", self.customer_id)
            .eq_if("quote_number", self.quote_number.as_str())
            .eq_opt("status", self.status.map(|s| s.as_str()))
            .include_deleted_if(self.include_deleted)
    }
}

/// Quote data access.
#[async_trait]
pub trait QuoteDao: CrudDao<Quote, Query = QuoteQuery> {
    /// Live quotes answering a request, newest first.
    async fn list_for_rfq(&self, ctx: &RequestContext, rfq_id: Uuid) -> ForwarderResult<Vec<Quote>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfq_query() {
        let customer = Uuid::now_v7();
        let query = RfqQuery {
            customer_id: customer,
            status: Some(RfqStatus::Open),
            ..RfqQuery::default()
        };
        assert_eq!(
            query.to_filter().to_string(),
            format!("customer_id = {}, status = 'open'", customer)
        );
    }

    #[test]
    fn test_quote_query_skips_blank_number() {
        let query = QuoteQuery {
            quote_number: String::new(),
            status: Some(QuoteStatus::Sent),
            ..QuoteQuery::default()
        };
        assert_eq!(query.to_filter().to_string(), "status = 'sent'");
    }
}
