//! Air waybill entities: the bill itself and its charge, routing and
//! document child records.

use super::{assign_if_nil, non_negative, positive};
use chrono::NaiveDate;
use forwarder_core::{rules, Audit, Auditable, Entity, SoftDelete};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Header data of a master or house air waybill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct AirwayBillInfo {
    pub id: Uuid,

    /// Shipment the bill belongs to.
    pub shipment_id: Uuid,

    /// Air waybill number, `PPP-SSSSSSSC`.
    #[validate(custom(function = "rules::awb_number"))]
    pub awb_number: String,

    /// True for a master waybill, false for a house waybill.
    pub is_master: bool,

    #[validate(length(min = 1, max = 128))]
    pub shipper_name: String,

    #[validate(length(min = 1, max = 128))]
    pub consignee_name: String,

    /// Departure airport (IATA).
    #[validate(custom(function = "rules::iata_code"))]
    pub origin: String,

    /// Destination airport (IATA).
    #[validate(custom(function = "rules::iata_code"))]
    pub destination: String,

    #[validate(range(min = 1))]
    pub pieces: i32,

    #[validate(custom(function = "non_negative"))]
    pub gross_weight_kg: Decimal,

    #[validate(custom(function = "positive"))]
    pub chargeable_weight_kg: Decimal,

    #[validate(length(max = 256))]
    pub commodity: Option<String>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deletion: SoftDelete,
}

impl AirwayBillInfo {
    /// Creates an unsaved bill for a shipment.
    #[must_use]
    pub fn new(shipment_id: Uuid, awb_number: impl Into<String>, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            shipment_id,
            awb_number: awb_number.into(),
            is_master: true,
            shipper_name: String::new(),
            consignee_name: String::new(),
            origin: origin.into(),
            destination: destination.into(),
            pieces: 1,
            gross_weight_kg: Decimal::ZERO,
            chargeable_weight_kg: Decimal::ONE,
            commodity: None,
            audit: Audit::default(),
            deletion: SoftDelete::default(),
        }
    }

    /// Sets the shipper and consignee names.
    #[must_use]
    pub fn with_parties(mut self, shipper: impl Into<String>, consignee: impl Into<String>) -> Self {
        self.shipper_name = shipper.into();
        self.consignee_name = consignee.into();
        self
    }

    /// Sets piece count and weights.
    #[must_use]
    pub fn with_cargo(mut self, pieces: i32, gross_weight_kg: Decimal, chargeable_weight_kg: Decimal) -> Self {
        self.pieces = pieces;
        self.gross_weight_kg = gross_weight_kg;
        self.chargeable_weight_kg = chargeable_weight_kg;
        self
    }

    /// Airline prefix of the waybill number.
    #[must_use]
    pub fn airline_prefix(&self) -> Option<&str> {
        self.awb_number.split_once('-').map(|(prefix, _)| prefix)
    }
}

impl Entity for AirwayBillInfo {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for AirwayBillInfo {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

/// One charge line printed on a waybill (freight, fuel surcharge, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct AirwayBillCharge {
    pub id: Uuid,

    /// Parent bill.
    pub bill_info_id: Uuid,

    /// Charge code, e.g. `FSC` or `AWC`.
    #[validate(length(min = 2, max = 3))]
    pub charge_code: String,

    #[validate(length(max = 128))]
    pub description: Option<String>,

    #[validate(custom(function = "non_negative"))]
    pub amount: Decimal,

    #[validate(custom(function = "rules::currency_code"))]
    pub currency: String,

    /// Prepaid by the shipper (true) or collected from the consignee.
    pub prepaid: bool,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl AirwayBillCharge {
    /// Creates an unsaved prepaid charge.
    #[must_use]
    pub fn new(bill_info_id: Uuid, charge_code: impl Into<String>, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            bill_info_id,
            charge_code: charge_code.into(),
            description: None,
            amount,
            currency: currency.into(),
            prepaid: true,
            audit: Audit::default(),
        }
    }
}

impl Entity for AirwayBillCharge {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for AirwayBillCharge {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

/// One flight leg of a waybill's routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct AirwayBillRoute {
    pub id: Uuid,

    /// Parent bill.
    pub bill_info_id: Uuid,

    /// 1-based position of the leg.
    #[validate(range(min = 1))]
    pub leg_sequence: i32,

    /// Two-character airline designator.
    #[validate(length(equal = 2))]
    pub carrier_code: String,

    #[validate(length(min = 1, max = 8))]
    pub flight_number: String,

    #[validate(custom(function = "rules::iata_code"))]
    pub departure_airport: String,

    #[validate(custom(function = "rules::iata_code"))]
    pub arrival_airport: String,

    pub flight_date: Option<NaiveDate>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

impl AirwayBillRoute {
    /// Creates an unsaved leg.
    #[must_use]
    pub fn new(
        bill_info_id: Uuid,
        leg_sequence: i32,
        carrier_code: impl Into<String>,
        flight_number: impl Into<String>,
        departure_airport: impl Into<String>,
        arrival_airport: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            bill_info_id,
            leg_sequence,
            carrier_code: carrier_code.into(),
            flight_number: flight_number.into(),
            departure_airport: departure_airport.into(),
            arrival_airport: arrival_airport.into(),
            flight_date: None,
            audit: Audit::default(),
        }
    }
}

impl Entity for AirwayBillRoute {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for AirwayBillRoute {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

/// A scanned or generated document attached to a waybill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct AirwayBillDoc {
    pub id: Uuid,

    /// Parent bill.
    pub bill_info_id: Uuid,

    /// Document kind, e.g. `commercial_invoice`, `packing_list`.
    #[validate(length(min = 1, max = 64))]
    pub doc_type: String,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    /// Object-storage key of the file.
    #[validate(length(min = 1, max = 512))]
    pub storage_key: String,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deletion: SoftDelete,
}

impl AirwayBillDoc {
    /// Creates an unsaved document record.
    #[must_use]
    pub fn new(bill_info_id: Uuid, doc_type: impl Into<String>, file_name: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            bill_info_id,
            doc_type: doc_type.into(),
            file_name: file_name.into(),
            storage_key: storage_key.into(),
            audit: Audit::default(),
            deletion: SoftDelete::default(),
        }
    }
}

impl Entity for AirwayBillDoc {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn ensure_id(&mut self) -> bool {
        assign_if_nil(&mut self.id)
    }
}

impl Auditable for AirwayBillDoc {
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

    fn bill() -> AirwayBillInfo {
        AirwayBillInfo::new(Uuid::now_v7(), "176-12345675", "DXB", "JFK")
            .with_parties("Acme Textiles", "Northwind Imports")
            .with_cargo(4, Decimal::new(3125, 1), Decimal::new(420, 0))
    }

    #[test]
    fn test_valid_bill() {
        let bill = bill();
        assert!(bill.validate().is_ok());
        assert_eq!(bill.airline_prefix(), Some("176"));
    }

    #[test]
    fn test_bad_check_digit_rejected() {
        let mut bill = bill();
        bill.awb_number = "176-12345670".to_string();
        let errors = bill.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("awb_number"));
    }

    #[test]
    fn test_zero_chargeable_weight_rejected() {
        let bill = bill().with_cargo(1, Decimal::ZERO, Decimal::ZERO);
        let errors = bill.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("chargeable_weight_kg"));
        assert!(!errors.field_errors().contains_key("gross_weight_kg"));
    }

    #[test]
    fn test_charge_currency_must_be_iso() {
        let mut charge = AirwayBillCharge::new(Uuid::now_v7(), "FSC", Decimal::new(1250, 2), "USD");
        assert!(charge.validate().is_ok());

        charge.currency = "us$".to_string();
        assert!(charge.validate().is_err());
    }

    #[test]
    fn test_route_leg_validation() {
        let leg = AirwayBillRoute::new(Uuid::now_v7(), 1, "EK", "EK201", "DXB", "JFK");
        assert!(leg.validate().is_ok());

        let bad = AirwayBillRoute::new(Uuid::now_v7(), 0, "EMI", "", "DXB", "jfk");
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["leg_sequence", "carrier_code", "flight_number", "arrival_airport"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_doc_is_soft_deletable() {
        let doc = AirwayBillDoc::new(Uuid::now_v7(), "packing_list", "pl.pdf", "tenant/awb/pl.pdf");
        assert!(!doc.deletion.is_deleted());
        assert!(doc.validate().is_ok());
    }
}
