//! [`Record`] implementations for the domain entities.

use crate::record::{DeletePolicy, Record};
use crate::tenant::TableScope;
use forwarder_domain::{
    Airport, AirwayBillCharge, AirwayBillDoc, AirwayBillInfo, AirwayBillRoute, Invoice,
    InvoiceLineItem, InvoiceSequence, LineItemExchangeRate, Quote, Rfq, Shipment, ShipmentParty,
    TimelineEvent,
};
use sqlx::query_builder::Separated;
use sqlx::Postgres;

type Row<'qb, 'args> = Separated<'qb, 'args, Postgres, &'static str>;

impl Record for Shipment {
    const RESOURCE: &'static str = "Shipment";
    const TABLE: &'static str = "shipment";
    const COLUMNS: &'static [&'static str] = &[
        "reference",
        "customer_id",
        "mode",
        "status",
        "origin",
        "destination",
        "etd",
        "eta",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft;
    const DEFAULT_ORDER: Option<&'static str> = Some("created_at DESC, id DESC");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.reference.clone())
            .push_bind(self.customer_id)
            .push_bind(self.mode.as_str())
            .push_bind(self.status.as_str())
            .push_bind(self.origin.clone())
            .push_bind(self.destination.clone())
            .push_bind(self.etd)
            .push_bind(self.eta);
    }
}

impl Record for AirwayBillInfo {
    const RESOURCE: &'static str = "AirwayBillInfo";
    const TABLE: &'static str = "airway_bill_info";
    const COLUMNS: &'static [&'static str] = &[
        "shipment_id",
        "awb_number",
        "is_master",
        "shipper_name",
        "consignee_name",
        "origin",
        "destination",
        "pieces",
        "gross_weight_kg",
        "chargeable_weight_kg",
        "commodity",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft;
    const DEFAULT_ORDER: Option<&'static str> = Some("created_at, id");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.shipment_id)
            .push_bind(self.awb_number.clone())
            .push_bind(self.is_master)
            .push_bind(self.shipper_name.clone())
            .push_bind(self.consignee_name.clone())
            .push_bind(self.origin.clone())
            .push_bind(self.destination.clone())
            .push_bind(self.pieces)
            .push_bind(self.gross_weight_kg)
            .push_bind(self.chargeable_weight_kg)
            .push_bind(self.commodity.clone());
    }
}

impl Record for AirwayBillCharge {
    const RESOURCE: &'static str = "AirwayBillCharge";
    const TABLE: &'static str = "airway_bill_charge";
    const COLUMNS: &'static [&'static str] = &[
        "bill_info_id",
        "charge_code",
        "description",
        "amount",
        "currency",
        "prepaid",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;
    const DEFAULT_ORDER: Option<&'static str> = Some("created_at, id");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.bill_info_id)
            .push_bind(self.charge_code.clone())
            .push_bind(self.description.clone())
            .push_bind(self.amount)
            .push_bind(self.currency.clone())
            .push_bind(self.prepaid);
    }
}

impl Record for AirwayBillRoute {
    const RESOURCE: &'static str = "AirwayBillRoute";
    const TABLE: &'static str = "airway_bill_route";
    const COLUMNS: &'static [&'static str] = &[
        "bill_info_id",
        "leg_sequence",
        "carrier_code",
        "flight_number",
        "departure_airport",
        "arrival_airport",
        "flight_date",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;
    const DEFAULT_ORDER: Option<&'static str> = Some("leg_sequence");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.bill_info_id)
            .push_bind(self.leg_sequence)
            .push_bind(self.carrier_code.clone())
            .push_bind(self.flight_number.clone())
            .push_bind(self.departure_airport.clone())
            .push_bind(self.arrival_airport.clone())
            .push_bind(self.flight_date);
    }
}

impl Record for AirwayBillDoc {
    const RESOURCE: &'static str = "AirwayBillDoc";
    const TABLE: &'static str = "airway_bill_doc";
    const COLUMNS: &'static [&'static str] = &["bill_info_id", "doc_type", "file_name", "storage_key"];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::SoftThenHard;
    const DEFAULT_ORDER: Option<&'static str> = Some("created_at, id");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.bill_info_id)
            .push_bind(self.doc_type.clone())
            .push_bind(self.file_name.clone())
            .push_bind(self.storage_key.clone());
    }
}

impl Record for Invoice {
    const RESOURCE: &'static str = "Invoice";
    const TABLE: &'static str = "invoice";
    const COLUMNS: &'static [&'static str] = &[
        "invoice_number",
        "shipment_id",
        "customer_id",
        "status",
        "currency",
        "total_amount",
        "issued_at",
        "due_date",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft;
    const DEFAULT_ORDER: Option<&'static str> = Some("created_at DESC, id DESC");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.invoice_number.clone())
            .push_bind(self.shipment_id)
            .push_bind(self.customer_id)
            .push_bind(self.status.as_str())
            .push_bind(self.currency.clone())
            .push_bind(self.total_amount)
            .push_bind(self.issued_at)
            .push_bind(self.due_date);
    }
}

impl Record for InvoiceLineItem {
    const RESOURCE: &'static str = "InvoiceLineItem";
    const TABLE: &'static str = "invoice_line_item";
    const COLUMNS: &'static [&'static str] = &[
        "invoice_id",
        "line_number",
        "description",
        "quantity",
        "unit_price",
        "amount",
        "currency",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;
    const DEFAULT_ORDER: Option<&'static str> = Some("line_number");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.invoice_id)
            .push_bind(self.line_number)
            .push_bind(self.description.clone())
            .push_bind(self.quantity)
            .push_bind(self.unit_price)
            .push_bind(self.amount)
            .push_bind(self.currency.clone());
    }
}

impl Record for LineItemExchangeRate {
    const RESOURCE: &'static str = "LineItemExchangeRate";
    const TABLE: &'static str = "line_item_exchange_rate";
    const COLUMNS: &'static [&'static str] =
        &["line_item_id", "from_currency", "to_currency", "rate", "rate_date"];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.line_item_id)
            .push_bind(self.from_currency.clone())
            .push_bind(self.to_currency.clone())
            .push_bind(self.rate)
            .push_bind(self.rate_date);
    }
}

impl Record for InvoiceSequence {
    const RESOURCE: &'static str = "InvoiceSequence";
    const TABLE: &'static str = "invoice_sequence";
    const COLUMNS: &'static [&'static str] = &["name", "prefix", "padding", "last_value"];
    const CONFLICT_TARGET: &'static [&'static str] = &["name"];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.name.clone())
            .push_bind(self.prefix.clone())
            .push_bind(self.padding)
            .push_bind(self.last_value);
    }
}

impl Record for Quote {
    const RESOURCE: &'static str = "Quote";
    const TABLE: &'static str = "quote";
    const COLUMNS: &'static [&'static str] = &[
        "rfq_id",
        "customer_id",
        "quote_number",
        "status",
        "currency",
        "total_amount",
        "valid_until",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft;
    const DEFAULT_ORDER: Option<&'static str> = Some("created_at DESC, id DESC");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.rfq_id)
            .push_bind(self.customer_id)
            .push_bind(self.quote_number.clone())
            .push_bind(self.status.as_str())
            .push_bind(self.currency.clone())
            .push_bind(self.total_amount)
            .push_bind(self.valid_until);
    }
}

impl Record for Rfq {
    const RESOURCE: &'static str = "Rfq";
    const TABLE: &'static str = "rfq";
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "mode",
        "origin",
        "destination",
        "cargo_description",
        "weight_kg",
        "status",
        "due_by",
    ];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft;
    const DEFAULT_ORDER: Option<&'static str> = Some("created_at DESC, id DESC");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.customer_id)
            .push_bind(self.mode.as_str())
            .push_bind(self.origin.clone())
            .push_bind(self.destination.clone())
            .push_bind(self.cargo_description.clone())
            .push_bind(self.weight_kg)
            .push_bind(self.status.as_str())
            .push_bind(self.due_by);
    }
}

impl Record for ShipmentParty {
    const RESOURCE: &'static str = "ShipmentParty";
    const TABLE: &'static str = "shipment_party";
    const COLUMNS: &'static [&'static str] = &[
        "shipment_id",
        "role",
        "name",
        "address",
        "contact_email",
        "contact_phone",
    ];
    const CONFLICT_TARGET: &'static [&'static str] = &["shipment_id", "role"];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.shipment_id)
            .push_bind(self.role.as_str())
            .push_bind(self.name.clone())
            .push_bind(self.address.clone())
            .push_bind(self.contact_email.clone())
            .push_bind(self.contact_phone.clone());
    }
}

impl Record for TimelineEvent {
    const RESOURCE: &'static str = "TimelineEvent";
    const TABLE: &'static str = "timeline_event";
    const COLUMNS: &'static [&'static str] =
        &["shipment_id", "event_code", "description", "location", "occurred_at"];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;
    const DEFAULT_ORDER: Option<&'static str> = Some("occurred_at, id");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.shipment_id)
            .push_bind(self.event_code.clone())
            .push_bind(self.description.clone())
            .push_bind(self.location.clone())
            .push_bind(self.occurred_at);
    }
}

impl Record for Airport {
    const RESOURCE: &'static str = "Airport";
    const TABLE: &'static str = "airport";
    const SCOPE: TableScope = TableScope::Public;
    const ID_COLUMN: &'static str = "code";
    const COLUMNS: &'static [&'static str] = &["name", "city", "country_code"];
    const CONFLICT_TARGET: &'static [&'static str] = &["code"];
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;
    const DEFAULT_ORDER: Option<&'static str> = Some("code");

    fn bind_columns(&self, row: &mut Row<'_, '_>) {
        row.push_bind(self.name.clone())
            .push_bind(self.city.clone())
            .push_bind(self.country_code.clone());
    }
}
