//! Invoices, their line items, per-line exchange rates and the numbering
//! sequences invoice numbers are drawn from.

use super::{assign_if_nil, non_negative, positive};
use crate::InvoiceStatus;
use chrono::{DateTime, NaiveDate, Utc};
use forwarder_core::{rules, Audit, Auditable, Entity, SoftDelete};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Sequence name used when the caller does not pick one.
pub const DEFAULT_INVOICE_SEQUENCE: &str = "invoice";

/// Customer invoice header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Invoice {
    pub id: Uuid,

    /// Formatted number allocated from an [`InvoiceSequence`].
    #[validate(length(min = 1, max = 32))]
    pub invoice_number: String,

    /// Shipment being billed. Invoices for ad-hoc services carry none.
    pub shipment_id: Option<Uuid>,

    pub customer_id: Uuid,

    #[sqlx(try_from = "String")]
    pub status: InvoiceStatus,

    #[validate(custom(function = "rules::currency_code"))]
    pub currency: String,

    /// Sum of line item amounts in the invoice currency.
    #[validate(custom(function = "non_negative"))]
    pub total_amount: Decimal,

    pub issued_at: Option<DateTime<Utc>>,

    pub due_date: Option<NaiveDate>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deletion: SoftDelete,
}

impl Invoice {
    /// Creates an unsaved draft invoice.
    #[must_use]
    pub fn new(invoice_number: impl Into<String>, customer_id: Uuid, currency: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            invoice_number: invoice_number.into(),
            shipment_id: None,
            customer_id,
            status: InvoiceStatus::Draft,
            currency: currency.into(),
            total_amount: Decimal::ZERO,
            issued_at: None,
            due_date: None,
            audit: Audit::default(),
            deletion: SoftDelete::default(),
        }
    }

    /// Links the invoice to a shipment.
    #[must_use]
    pub fn for_shipment(mut self, shipment_id: Uuid) -> Self {
        self.shipment_id = Some(shipment_id);
        self
    }

    /// Recomputes `total_amount` from the given lines.
    pub fn recalculate_total<'a>(&mut self, lines: impl IntoIterator<Item = &'a InvoiceLineItem>) {
        self.total_amount = lines.into_iter().map(|line| line.amount).sum();
    }
}

impl Entity for Invoice {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for Invoice {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

/// One billed service on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct InvoiceLineItem {
    pub id: Uuid,

    pub invoice_id: Uuid,

    /// 1-based position on the invoice.
    #[validate(range(min = 1))]
    pub line_number: i32,

    #[validate(length(min = 1, max = 256))]
    pub description: String,

    #[validate(custom(function = "positive"))]
    pub quantity: Decimal,

    #[validate(custom(function = "non_negative"))]
    pub unit_price: Decimal,

    /// `quantity * unit_price`, rounded to cents.
    #[validate(custom(function = "non_negative"))]
    pub amount: Decimal,

    /// Currency the line was priced in. May differ from the invoice currency.
    #[validate(custom(function = "rules::currency_code"))]
    pub currency: String,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl InvoiceLineItem {
    /// Creates an unsaved line with its amount computed.
    #[must_use]
    pub fn new(
        invoice_id: Uuid,
        line_number: i32,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        let mut line = Self {
            id: Uuid::nil(),
            invoice_id,
            line_number,
            description: description.into(),
            quantity,
            unit_price,
            amount: Decimal::ZERO,
            currency: currency.into(),
            audit: Audit::default(),
        };
        line.compute_amount();
        line
    }

    /// Sets `amount` from quantity and unit price.
    pub fn compute_amount(&mut self) {
        self.amount = (self.quantity * self.unit_price).round_dp(2);
    }
}

impl Entity for InvoiceLineItem {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for InvoiceLineItem {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

/// Rate used to convert a line item into the invoice currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct LineItemExchangeRate {
    pub id: Uuid,

    pub line_item_id: Uuid,

    #[validate(custom(function = "rules::currency_code"))]
    pub from_currency: String,

    #[validate(custom(function = "rules::currency_code"))]
    pub to_currency: String,

    /// Units of `to_currency` per unit of `from_currency`.
    #[validate(custom(function = "positive"))]
    pub rate: Decimal,

    pub rate_date: NaiveDate,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl LineItemExchangeRate {
    /// Creates an unsaved rate.
    #[must_use]
    pub fn new(
        line_item_id: Uuid,
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: Decimal,
        rate_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            line_item_id,
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
            rate_date,
            audit: Audit::default(),
        }
    }

    /// Converts an amount in `from_currency`, rounded to cents.
    #[must_use]
    pub fn convert(&self, amount: Decimal) -> Decimal {
        (amount * self.rate).round_dp(2)
    }
}

impl Entity for LineItemExchangeRate {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for LineItemExchangeRate {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

/// A named counter invoice numbers are allocated from.
///
/// `last_value` is the most recently issued value; a fresh sequence starts
/// at zero so its first allocation is 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct InvoiceSequence {
    pub id: Uuid,

    /// Unique within the tenant.
    #[validate(length(min = 1, max = 64), custom(function = "rules::not_blank"))]
    pub name: String,

    #[validate(length(max = 16))]
    pub prefix: String,

    /// Minimum digit count of the formatted value.
    #[validate(range(min = 1, max = 18))]
    pub padding: i32,

    #[validate(range(min = 0))]
    pub last_value: i64,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl InvoiceSequence {
    /// Creates an unsaved sequence that has issued nothing yet.
    #[must_use]
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, padding: i32) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            prefix: prefix.into(),
            padding,
            last_value: 0,
            audit: Audit::default(),
        }
    }

    /// Formats `value` as `<prefix><zero-padded value>`.
    #[must_use]
    pub fn format_number(&self, value: i64) -> String {
        let width = usize::try_from(self.padding).unwrap_or(0);
        format!("{}{:0width$}", self.prefix, value, width = width)
    }

    /// The most recently issued number, formatted.
    #[must_use]
    pub fn current_number(&self) -> String {
        self.format_number(self.last_value)
    }
}

impl Entity for InvoiceSequence {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for InvoiceSequence {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}
