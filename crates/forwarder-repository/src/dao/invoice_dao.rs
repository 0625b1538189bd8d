//! Invoice DAOs.
//!
//! An invoice is written together with its number, lines and exchange rates.
//! Every DAO here therefore has `_in` variants that take a caller-opened
//! transaction:
//!
//! ```ignore
//! let mut tx = pool.inner().begin().await?;
//! let number = sequences.new_invoice_number_in(&mut tx, &ctx, DEFAULT_INVOICE_SEQUENCE).await?;
//! let mut invoice = Invoice::new(number, customer_id, "USD");
//! invoices.upsert_in(&mut tx, &ctx, &mut invoice).await?;
//! lines.upsert_all_in(&mut tx, &ctx, &mut items).await?;
//! tx.commit().await?;
//! ```

use super::{CrudDao, RecordQuery};
use crate::filter::Filter;
use async_trait::async_trait;
use chrono::NaiveDate;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::{Invoice, InvoiceLineItem, InvoiceSequence, InvoiceStatus, LineItemExchangeRate};
use sqlx::PgConnection;
use uuid::Uuid;

/// Filter arguments for invoice lookups.
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    pub id: Uuid,
    pub ids: Vec<Uuid>,
    pub invoice_number: String,
    pub shipment_id: Uuid,
    pub customer_id: Uuid,
    pub status: Option<InvoiceStatus>,
    /// Inclusive due date range.
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    pub include_deleted: bool,
}

impl RecordQuery for InvoiceQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .any_of("id", self.ids.clone())
            .eq_if("invoice_number", self.invoice_number.as_str())
            .eq_if("shipment_id", self.shipment_id)
            .eq_if("customer_id", self.customer_id)
            .eq_opt("status", self.status.map(|s| s.as_str()))
            .gte_opt("due_date", self.due_from)
            .lte_opt("due_date", self.due_to)
            .include_deleted_if(self.include_deleted)
    }
}

/// Invoice header data access.
#[async_trait]
pub trait InvoiceDao: CrudDao<Invoice, Query = InvoiceQuery> {
    /// The live invoice with this number, or `NotFound`.
    async fn get_by_number(&self, ctx: &RequestContext, invoice_number: &str) -> ForwarderResult<Invoice>;
}

/// Filter arguments for line item lookups.
#[derive(Debug, Clone, Default)]
pub struct InvoiceLineItemQuery {
    pub id: Uuid,
    pub ids: Vec<Uuid>,
    pub invoice_id: Uuid,
    pub invoice_ids: Vec<Uuid>,
    pub currency: String,
}

impl RecordQuery for InvoiceLineItemQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .any_of("id", self.ids.clone())
            .eq_if("invoice_id", self.invoice_id)
            .any_of("invoice_id", self.invoice_ids.clone())
            .eq_if("currency", self.currency.as_str())
    }
}

/// Invoice line data access. Lines come back in line-number order.
#[async_trait]
pub trait InvoiceLineItemDao: CrudDao<InvoiceLineItem, Query = InvoiceLineItemQuery> {
    async fn list_for_invoice(&self, ctx: &RequestContext, invoice_id: Uuid) -> ForwarderResult<Vec<InvoiceLineItem>>;

    async fn list_for_invoice_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        invoice_id: Uuid,
    ) -> ForwarderResult<Vec<InvoiceLineItem>>;
}

/// Filter arguments for exchange rate lookups.
#[derive(Debug, Clone, Default)]
pub struct LineItemExchangeRateQuery {
    pub id: Uuid,
    pub line_item_id: Uuid,
    pub line_item_ids: Vec<Uuid>,
    pub from_currency: String,
    pub to_currency: String,
}

impl RecordQuery for LineItemExchangeRateQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("id", self.id)
            .eq_if("line_item_id", self.line_item_id)
            .any_of("line_item_id", self.line_item_ids.clone())
            .eq_if("from_currency", self.from_currency.as_str())
            .eq_if("to_currency", self.to_currency.as_str())
    }
}

/// Exchange rate data access.
#[async_trait]
pub trait LineItemExchangeRateDao: CrudDao<LineItemExchangeRate, Query = LineItemExchangeRateQuery> {
    /// The rate attached to a line item, or `NotFound`.
    async fn get_for_line_item(&self, ctx: &RequestContext, line_item_id: Uuid) -> ForwarderResult<LineItemExchangeRate>;

    /// Rates for many line items. An empty id list returns every rate.
    async fn list_for_line_items(
        &self,
        ctx: &RequestContext,
        line_item_ids: &[Uuid],
    ) -> ForwarderResult<Vec<LineItemExchangeRate>>;

    async fn list_for_line_items_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        line_item_ids: &[Uuid],
    ) -> ForwarderResult<Vec<LineItemExchangeRate>>;
}

/// Filter arguments for sequence lookups.
#[derive(Debug, Clone, Default)]
pub struct InvoiceSequenceQuery {
    pub id: Uuid,
    pub name: String,
}

impl RecordQuery for InvoiceSequenceQuery {
    fn to_filter(&self) -> Filter {
        Filter::new().eq_if("id", self.id).eq_if("name", self.name.as_str())
    }
}

/// Invoice number allocation.
#[async_trait]
pub trait InvoiceSequenceDao: CrudDao<InvoiceSequence, Query = InvoiceSequenceQuery> {
    /// Allocates and formats the next number of the named sequence,
    /// creating the sequence on first use.
    ///
    /// Concurrent callers never receive the same number.
    async fn new_invoice_number(&self, ctx: &RequestContext, name: &str) -> ForwarderResult<String>;

    /// [`new_invoice_number`](Self::new_invoice_number) inside a transaction.
    /// A rollback releases the number.
    async fn new_invoice_number_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        name: &str,
    ) -> ForwarderResult<String>;

    /// The named sequence, or `NotFound`.
    async fn get_by_name(&self, ctx: &RequestContext, name: &str) -> ForwarderResult<InvoiceSequence>;
}
