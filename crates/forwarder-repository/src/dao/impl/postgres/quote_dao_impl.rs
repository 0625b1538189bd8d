//! Postgres RFQ and quote DAOs.

use super::PgCrudDao;
use crate::dao::{CrudDao, QuoteDao, QuoteQuery, RfqDao, RfqQuery};
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{Quote, Rfq, RfqStatus};
use uuid::Uuid;

pub type PgRfqDao = PgCrudDao<Rfq, RfqQuery>;
pub type PgQuoteDao = PgCrudDao<Quote, QuoteQuery>;

#[async_trait]
impl RfqDao for PgRfqDao {
    async fn list_for_customer(
        &self,
        ctx: &RequestContext,
        customer_id: Uuid,
        status: Option<RfqStatus>,
    ) -> ForwarderResult<Vec<Rfq>> {
        let query = RfqQuery {
            customer_id,
            status,
            ..RfqQuery::default()
        };
        self.get_all(ctx, &query).await
    }
}

#[async_trait]
impl QuoteDao for PgQuoteDao {
    async fn list_for_rfq(&self, ctx: &RequestContext, rfq_id: Uuid) -> ForwarderResult<Vec<Quote>> {
        let query = QuoteQuery {
            rfq_id,
            ..QuoteQuery::default()
        };
        self.get_all(ctx, &query).await
    }
}
