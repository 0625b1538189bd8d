//! Postgres invoice DAOs and invoice number allocation.

use super::PgCrudDao;
use crate::dao::{
    CrudDao, InvoiceDao, InvoiceLineItemDao, InvoiceLineItemQuery, InvoiceQuery, InvoiceSequenceDao,
    InvoiceSequenceQuery, LineItemExchangeRateDao, LineItemExchangeRateQuery,
};
use crate::pool::DatabasePoolInterface;
use crate::repository::{storage_error, TenantRepository};
use async_trait::async_trait;
use forwarder_config::TenancyConfig;
use forwarder_core::{
    now_utc, ForwarderError, ForwarderResult, Page, PageRequest, RequestContext, ValidateExt,
};
use forwarder_domain::{Invoice, InvoiceLineItem, InvoiceSequence, LineItemExchangeRate};
use sqlx::{PgConnection, PgExecutor, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub type PgInvoiceDao = PgCrudDao<Invoice, InvoiceQuery>;
pub type PgInvoiceLineItemDao = PgCrudDao<InvoiceLineItem, InvoiceLineItemQuery>;
pub type PgLineItemExchangeRateDao = PgCrudDao<LineItemExchangeRate, LineItemExchangeRateQuery>;

#[async_trait]
impl InvoiceDao for PgInvoiceDao {
    async fn get_by_number(&self, ctx: &RequestContext, invoice_number: &str) -> ForwarderResult<Invoice> {
        let query = InvoiceQuery {
            invoice_number: invoice_number.to_string(),
            ..InvoiceQuery::default()
        };
        self.get(ctx, &query).await
    }
}

fn lines_of(invoice_id: Uuid) -> InvoiceLineItemQuery {
    InvoiceLineItemQuery {
        invoice_id,
        ..InvoiceLineItemQuery::default()
    }
}

#[async_trait]
impl InvoiceLineItemDao for PgInvoiceLineItemDao {
    async fn list_for_invoice(&self, ctx: &RequestContext, invoice_id: Uuid) -> ForwarderResult<Vec<InvoiceLineItem>> {
        self.get_all(ctx, &lines_of(invoice_id)).await
    }

    async fn list_for_invoice_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        invoice_id: Uuid,
    ) -> ForwarderResult<Vec<InvoiceLineItem>> {
        self.get_all_in(conn, ctx, &lines_of(invoice_id)).await
    }
}

fn rates_of(line_item_ids: &[Uuid]) -> LineItemExchangeRateQuery {
    LineItemExchangeRateQuery {
        line_item_ids: line_item_ids.to_vec(),
        ..LineItemExchangeRateQuery::default()
    }
}

#[async_trait]
impl LineItemExchangeRateDao for PgLineItemExchangeRateDao {
    async fn get_for_line_item(&self, ctx: &RequestContext, line_item_id: Uuid) -> ForwarderResult<LineItemExchangeRate> {
        let query = LineItemExchangeRateQuery {
            line_item_id,
            ..LineItemExchangeRateQuery::default()
        };
        self.get(ctx, &query).await
    }

    async fn list_for_line_items(
        &self,
        ctx: &RequestContext,
        line_item_ids: &[Uuid],
    ) -> ForwarderResult<Vec<LineItemExchangeRate>> {
        self.get_all(ctx, &rates_of(line_item_ids)).await
    }

    async fn list_for_line_items_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        line_item_ids: &[Uuid],
    ) -> ForwarderResult<Vec<LineItemExchangeRate>> {
        self.get_all_in(conn, ctx, &rates_of(line_item_ids)).await
    }
}

/// Invoice sequences plus atomic number allocation.
///
/// A sequence is created on first allocation with the configured prefix
/// and padding; later allocations keep whatever the stored row says.
#[derive(Clone, Debug)]
pub struct PgInvoiceSequenceDao {
    crud: PgCrudDao<InvoiceSequence, InvoiceSequenceQuery>,
    prefix: String,
    padding: i32,
}

impl PgInvoiceSequenceDao {
    /// Creates a DAO that starts new sequences as `<prefix><padding digits>`.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>, prefix: impl Into<String>, padding: i32) -> Self {
        Self {
            crud: PgCrudDao::new(pool),
            prefix: prefix.into(),
            padding,
        }
    }

    /// Creates a DAO using the tenancy defaults for new sequences.
    pub fn from_config(pool: Arc<dyn DatabasePoolInterface>, config: &TenancyConfig) -> ForwarderResult<Self> {
        let padding = i32::try_from(config.invoice_number_width).map_err(|_| {
            ForwarderError::Configuration(format!(
                "invoice_number_width {} is out of range",
                config.invoice_number_width
            ))
        })?;
        Ok(Self::new(pool, config.invoice_prefix.clone(), padding))
    }

    fn repo(&self) -> &TenantRepository<InvoiceSequence> {
        self.crud.repository()
    }

    /// Creates the sequence at 1 or increments it, in one statement.
    async fn allocate<'e, X>(&self, executor: X, ctx: &RequestContext, name: &str) -> ForwarderResult<String>
    where
        X: PgExecutor<'e>,
    {
        let template = InvoiceSequence::new(name, self.prefix.as_str(), self.padding);
        template.validate_entity()?;

        let table = self.repo().table(ctx);
        let now = now_utc();
        debug!(tenant = %ctx.tenant(), table = %table, sequence = name, "Allocating invoice number");

        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
        qb.push(&table).push(
            " AS t (id, name, prefix, padding, last_value, created_at, created_by, updated_at, updated_by) VALUES (",
        );
        {
            let mut row = qb.separated(", ");
            row.push_bind(Uuid::now_v7())
                .push_bind(template.name)
                .push_bind(template.prefix)
                .push_bind(template.padding)
                .push_bind(1_i64)
                .push_bind(now)
                .push_bind(ctx.actor())
                .push_bind(now)
                .push_bind(ctx.actor());
        }
        qb.push(
            ") ON CONFLICT (name) DO UPDATE SET last_value = t.last_value + 1, \
             updated_at = GREATEST(EXCLUDED.updated_at, t.updated_at + interval '1 microsecond'), \
             updated_by = EXCLUDED.updated_by RETURNING *",
        );

        let sequence = qb
            .build_query_as::<InvoiceSequence>()
            .fetch_one(executor)
            .await
            .map_err(|e| storage_error(ctx, &table, "new_invoice_number", e))?;

        let number = sequence.current_number();
        info!(tenant = %ctx.tenant(), sequence = name, number = %number, "Allocated invoice number");
        Ok(number)
    }
}

#[async_trait]
impl CrudDao<InvoiceSequence> for PgInvoiceSequenceDao {
    type Query = InvoiceSequenceQuery;

    async fn upsert(&self, ctx: &RequestContext, entity: &mut InvoiceSequence) -> ForwarderResult<InvoiceSequence> {
        self.crud.upsert(ctx, entity).await
    }

    async fn upsert_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entity: &mut InvoiceSequence,
    ) -> ForwarderResult<InvoiceSequence> {
        self.crud.upsert_in(conn, ctx, entity).await
    }

    async fn upsert_all(
        &self,
        ctx: &RequestContext,
        entities: &mut [InvoiceSequence],
    ) -> ForwarderResult<Vec<InvoiceSequence>> {
        self.crud.upsert_all(ctx, entities).await
    }

    async fn upsert_all_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entities: &mut [InvoiceSequence],
    ) -> ForwarderResult<Vec<InvoiceSequence>> {
        self.crud.upsert_all_in(conn, ctx, entities).await
    }

    async fn get(&self, ctx: &RequestContext, query: &InvoiceSequenceQuery) -> ForwarderResult<InvoiceSequence> {
        self.crud.get(ctx, query).await
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: &Uuid) -> ForwarderResult<InvoiceSequence> {
        self.crud.get_by_id(ctx, id).await
    }

    async fn get_all(&self, ctx: &RequestContext, query: &InvoiceSequenceQuery) -> ForwarderResult<Vec<InvoiceSequence>> {
        self.crud.get_all(ctx, query).await
    }

    async fn get_all_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        query: &InvoiceSequenceQuery,
    ) -> ForwarderResult<Vec<InvoiceSequence>> {
        self.crud.get_all_in(conn, ctx, query).await
    }

    async fn get_page(
        &self,
        ctx: &RequestContext,
        query: &InvoiceSequenceQuery,
        page: PageRequest,
    ) -> ForwarderResult<Page<InvoiceSequence>> {
        self.crud.get_page(ctx, query, page).await
    }

    async fn count(&self, ctx: &RequestContext, query: &InvoiceSequenceQuery) -> ForwarderResult<u64> {
        self.crud.count(ctx, query).await
    }

    async fn delete(&self, ctx: &RequestContext, id: &Uuid) -> ForwarderResult<bool> {
        self.crud.delete(ctx, id).await
    }

    async fn delete_all(&self, ctx: &RequestContext, query: &InvoiceSequenceQuery) -> ForwarderResult<u64> {
        self.crud.delete_all(ctx, query).await
    }
}

#[async_trait]
impl InvoiceSequenceDao for PgInvoiceSequenceDao {
    async fn new_invoice_number(&self, ctx: &RequestContext, name: &str) -> ForwarderResult<String> {
        self.allocate(self.repo().pool(), ctx, name).await
    }

    async fn new_invoice_number_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        name: &str,
    ) -> ForwarderResult<String> {
        self.allocate(conn, ctx, name).await
    }

    async fn get_by_name(&self, ctx: &RequestContext, name: &str) -> ForwarderResult<InvoiceSequence> {
        let query = InvoiceSequenceQuery {
            name: name.to_string(),
            ..InvoiceSequenceQuery::default()
        };
        self.crud.get(ctx, &query).await
    }
}
