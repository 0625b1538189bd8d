//! Read models assembled by report queries.

use crate::{ShipmentMode, ShipmentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One line of the daily status report: a shipment with its active air
/// waybill, latest tracking event and billed total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DsrRow {
    pub shipment_id: Uuid,
    pub reference: String,
    pub customer_id: Uuid,
    #[sqlx(try_from = "String")]
    pub mode: ShipmentMode,
    #[sqlx(try_from = "String")]
    pub status: ShipmentStatus,
    pub origin: String,
    pub destination: String,
    pub etd: Option<NaiveDate>,
    pub eta: Option<NaiveDate>,

    /// Master waybill number, if one is on file.
    pub awb_number: Option<String>,
    pub pieces: Option<i32>,
    pub chargeable_weight_kg: Option<Decimal>,

    pub last_event_code: Option<String>,
    pub last_event_location: Option<String>,
    pub last_event_at: Option<DateTime<Utc>>,

    /// Sum of non-void invoice totals; zero when nothing is billed.
    pub invoiced_total: Decimal,
    /// Number of non-void invoices.
    pub invoice_count: i64,
}

impl DsrRow {
    /// True when the shipment has no tracking event yet.
    #[must_use]
    pub fn is_untracked(&self) -> bool {
        self.last_event_at.is_none()
    }

    /// True when the shipment has not been invoiced.
    #[must_use]
    pub fn is_unbilled(&self) -> bool {
        self.invoice_count == 0
    }
}
