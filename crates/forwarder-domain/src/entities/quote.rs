//! Requests for quotation and the quotes answering them.

use super::{assign_if_nil, non_negative, positive};
use crate::{QuoteStatus, RfqStatus, ShipmentMode};
use chrono::{DateTime, NaiveDate, Utc};
use forwarder_core::{rules, Audit, Auditable, Entity, SoftDelete};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A customer's request for a price on a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Rfq {
    pub id: Uuid,

    pub customer_id: Uuid,

    #[sqlx(try_from = "String")]
    pub mode: ShipmentMode,

    #[validate(length(min = 3, max = 5))]
    pub origin: String,

    #[validate(length(min = 3, max = 5))]
    pub destination: String,

    #[validate(length(min = 1, max = 512), custom(function = "rules::not_blank"))]
    pub cargo_description: String,

    #[validate(custom(function = "positive"))]
    pub weight_kg: Option<Decimal>,

    #[sqlx(try_from = "String")]
    pub status: RfqStatus,

    /// Deadline for answering.
    pub due_by: Option<DateTime<Utc>>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deletion: SoftDelete,
}

impl Rfq {
    /// Creates an unsaved, open request.
    #[must_use]
    pub fn new(
        customer_id: Uuid,
        mode: ShipmentMode,
        origin: impl Into<String>,
        destination: impl Into<String>,
        cargo_description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            customer_id,
            mode,
            origin: origin.into(),
            destination: destination.into(),
            cargo_description: cargo_description.into(),
            weight_kg: None,
            status: RfqStatus::Open,
            due_by: None,
            audit: Audit::default(),
            deletion: SoftDelete::default(),
        }
    }
}

impl Entity for Rfq {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for Rfq {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

/// A priced offer, usually answering an [`Rfq`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Quote {
    pub id: Uuid,

    /// Request this quote answers. Unsolicited quotes carry none.
    pub rfq_id: Option<Uuid>,

    pub customer_id: Uuid,

    #[validate(length(min = 1, max = 32))]
    pub quote_number: String,

    #[sqlx(try_from = "String")]
    pub status: QuoteStatus,

    #[validate(custom(function = "rules::currency_code"))]
    pub currency: String,

    #[validate(custom(function = "non_negative"))]
    pub total_amount: Decimal,

    /// Last day the offer can be accepted.
    pub valid_until: Option<NaiveDate>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deletion: SoftDelete,
}

impl Quote {
    /// Creates an unsaved draft quote.
    #[must_use]
    pub fn new(quote_number: impl Into<String>, customer_id: Uuid, currency: impl Into<String>, total_amount: Decimal) -> Self {
        Self {
            id: Uuid::nil(),
            rfq_id: None,
            customer_id,
            quote_number: quote_number.into(),
            status: QuoteStatus::Draft,
            currency: currency.into(),
            total_amount,
            valid_until: None,
            audit: Audit::default(),
            deletion: SoftDelete::default(),
        }
    }

    /// Links the quote to the request it answers.
    #[must_use]
    pub fn answering(mut self, rfq_id: Uuid) -> Self {
        self.rfq_id = Some(rfq_id);
        self
    }

    /// Returns true when the offer has lapsed on `today`.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.valid_until.is_some_and(|until| until < today)
    }
}

impl Entity for Quote {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for Quote {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfq_optional_weight_validated_when_present() {
        let mut rfq = Rfq::new(Uuid::now_v7(), ShipmentMode::Ocean, "CNSHA", "NLRTM", "2x40HC furniture");
        assert!(rfq.validate().is_ok());

        rfq.weight_kg = Some(Decimal::ZERO);
        assert!(rfq.validate().unwrap_err().field_errors().contains_key("weight_kg"));
    }

    #[test]
    fn test_quote_expiry() {
        let mut quote = Quote::new("Q-0001", Uuid::now_v7(), "USD", Decimal::new(185000, 2));
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(!quote.is_expired_on(today));

        quote.valid_until = NaiveDate::from_ymd_opt(2024, 5, 9);
        assert!(quote.is_expired_on(today));

        quote.valid_until = Some(today);
        assert!(!quote.is_expired_on(today));
    }

    #[test]
    fn test_answering_links_rfq() {
        let rfq_id = Uuid::now_v7();
        let quote = Quote::new("Q-0002", Uuid::now_v7(), "EUR", Decimal::ZERO).answering(rfq_id);
        assert_eq!(quote.rfq_id, Some(rfq_id));
    }
}
