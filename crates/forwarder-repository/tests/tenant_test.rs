//! Integration tests for tenant isolation, shared reference data, quotes and
//! the daily status report.
//!
//! These tests run against a real Postgres database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::{Duration, NaiveDate, Utc};
use common::TestDatabase;
use forwarder_core::{RequestContext, TenantId};
use forwarder_domain::{
    Airport, AirwayBillInfo, Invoice, InvoiceStatus, Quote, Rfq, RfqStatus, Shipment, ShipmentMode, ShipmentStatus,
    TimelineEvent,
};
use forwarder_repository::{
    AirportDao, CrudDao, DatabasePoolInterface, DsrQuery, DsrReportDao, InvoiceSequenceDao, PgAirportDao,
    PgAirwayBillInfoDao, PgDsrReportDao, PgInvoiceDao, PgInvoiceSequenceDao, PgQuoteDao, PgRfqDao, PgShipmentDao,
    PgTimelineEventDao, QuoteDao, RfqDao, ShipmentQuery,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::test]
async fn test_tenants_are_isolated() {
    let db = TestDatabase::new().await;
    let acme = db.tenant("acme").await;
    let globex = db.tenant("globex").await;
    let dao = PgShipmentDao::new(db.pool());

    let mut shipment = Shipment::new("SHP-1", Uuid::now_v7(), ShipmentMode::Ocean, "CNSHA", "NLRTM");
    let saved = dao.upsert(&acme, &mut shipment).await.expect("Failed to save shipment");

    assert!(dao.get_by_id(&globex, &saved.id).await.unwrap_err().is_not_found());
    assert_eq!(dao.count(&globex, &ShipmentQuery::default()).await.expect("Count failed"), 0);

    // The same reference is free in another tenant.
    let mut other = Shipment::new("SHP-1", Uuid::now_v7(), ShipmentMode::Ocean, "CNSHA", "NLRTM");
    dao.upsert(&globex, &mut other).await.expect("Failed to save shipment");
    assert_ne!(other.id, saved.id);

    // Deleting in one tenant leaves the other untouched.
    assert!(!dao.delete(&globex, &saved.id).await.expect("Delete failed"));
    dao.get_by_id(&acme, &saved.id).await.expect("Shipment missing");
}

#[tokio::test]
async fn test_invoice_sequences_are_per_tenant() {
    let db = TestDatabase::new().await;
    let acme = db.tenant("acme").await;
    let globex = db.tenant("globex").await;
    let dao = PgInvoiceSequenceDao::new(db.pool(), "INV-", 6);

    dao.new_invoice_number(&acme, "invoice").await.expect("Allocation failed");
    dao.new_invoice_number(&acme, "invoice").await.expect("Allocation failed");
    let first = dao.new_invoice_number(&globex, "invoice").await.expect("Allocation failed");

    assert_eq!(first, "INV-000001");
}

#[tokio::test]
async fn test_provisioning_is_idempotent() {
    let db = TestDatabase::new().await;
    let tenant = TenantId::parse("initech").expect("Invalid tenant id");

    db.pool().provision_tenant(&tenant).await.expect("First provisioning failed");
    db.pool().provision_tenant(&tenant).await.expect("Second provisioning failed");

    let ctx = RequestContext::system(tenant);
    let count = PgShipmentDao::new(db.pool())
        .count(&ctx, &ShipmentQuery::default())
        .await
        .expect("Count failed");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_unprovisioned_tenant_is_a_database_error() {
    let db = TestDatabase::new().await;
    let ctx = RequestContext::system(TenantId::parse("nobody").expect("Invalid tenant id"));

    let err = PgShipmentDao::new(db.pool())
        .get_all(&ctx, &ShipmentQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, forwarder_core::ForwarderError::Database(_)));
}

#[tokio::test]
async fn test_airports_are_shared() {
    let db = TestDatabase::new().await;
    let acme = db.tenant("acme").await;
    let globex = db.tenant("globex").await;
    let dao = PgAirportDao::new(db.pool());

    let mut heathrow = Airport::new("LHR", "Heathrow", "London", "GB");
    dao.upsert(&acme, &mut heathrow).await.expect("Failed to save airport");
    let mut gatwick = Airport::new("LGW", "Gatwick", "London", "GB");
    dao.upsert(&acme, &mut gatwick).await.expect("Failed to save airport");

    let found = dao.get_by_code(&globex, " lhr").await.expect("Airport missing");
    assert_eq!(found.name, "Heathrow");

    let british = dao.list_by_country(&globex, " gb ").await.expect("Failed to list airports");
    let codes: Vec<&str> = british.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, ["LGW", "LHR"]);

    // Upserting an existing code updates it in place.
    let mut renamed = Airport::new("LHR", "London Heathrow", "London", "GB");
    dao.upsert(&globex, &mut renamed).await.expect("Failed to update airport");
    let found = dao.get_by_code(&acme, "LHR").await.expect("Airport missing");
    assert_eq!(found.name, "London Heathrow");
    assert_eq!(found.audit.created_at, heathrow.audit.created_at);
}

#[tokio::test]
async fn test_airports_follow_configured_public_schema() {
    let db = TestDatabase::with_public_schema("reference").await;
    let ctx = db.tenant("acme").await;
    let dao = PgAirportDao::new(db.pool());

    let mut changi = Airport::new("SIN", "Changi", "Singapore", "SG");
    dao.upsert(&ctx, &mut changi).await.expect("Failed to save airport");
    assert_eq!(dao.get_by_code(&ctx, "sin").await.expect("Airport missing").name, "Changi");

    let in_reference: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "reference".airport"#)
        .fetch_one(db.pool().inner())
        .await
        .expect("Count failed");
    assert_eq!(in_reference, 1);

    let in_public: Option<String> = sqlx::query_scalar("SELECT to_regclass('public.airport')::text")
        .fetch_one(db.pool().inner())
        .await
        .expect("Lookup failed");
    assert!(in_public.is_none());

    // Migrations are tracked per schema and rerun cleanly.
    db.pool().run_migrations().await.expect("Second migration run failed");
}

#[tokio::test]
async fn test_quotes_for_rfq() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let rfqs = PgRfqDao::new(db.pool());
    let quotes = PgQuoteDao::new(db.pool());
    let customer = Uuid::now_v7();

    let mut rfq = Rfq::new(customer, ShipmentMode::Air, "PVG", "ORD", "Machine parts");
    let rfq = rfqs.upsert(&ctx, &mut rfq).await.expect("Failed to save rfq");

    let mut closed = Rfq::new(customer, ShipmentMode::Ocean, "CNSHA", "USLAX", "Furniture");
    closed.status = RfqStatus::Closed;
    rfqs.upsert(&ctx, &mut closed).await.expect("Failed to save rfq");

    let open = rfqs
        .list_for_customer(&ctx, customer, Some(RfqStatus::Open))
        .await
        .expect("Failed to list rfqs");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, rfq.id);
    assert_eq!(rfqs.list_for_customer(&ctx, customer, None).await.expect("List failed").len(), 2);

    for (number, amount) in [("Q-1", 125_000), ("Q-2", 118_000)] {
        let mut quote = Quote::new(number, customer, "USD", Decimal::new(amount, 2)).answering(rfq.id);
        quotes.upsert(&ctx, &mut quote).await.expect("Failed to save quote");
    }
    let mut unrelated = Quote::new("Q-3", customer, "USD", Decimal::ONE_HUNDRED);
    quotes.upsert(&ctx, &mut unrelated).await.expect("Failed to save quote");

    let answered = quotes.list_for_rfq(&ctx, rfq.id).await.expect("Failed to list quotes");
    let numbers: Vec<&str> = answered.iter().map(|q| q.quote_number.as_str()).collect();
    assert_eq!(numbers, ["Q-2", "Q-1"]);
}

#[tokio::test]
async fn test_daily_status_report() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let shipments = PgShipmentDao::new(db.pool());
    let bills = PgAirwayBillInfoDao::new(db.pool());
    let events = PgTimelineEventDao::new(db.pool());
    let invoices = PgInvoiceDao::new(db.pool());
    let report = PgDsrReportDao::new(db.pool());
    let customer = Uuid::now_v7();

    let etd = NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date");
    let mut tracked = Shipment::new("SHP-A", customer, ShipmentMode::Air, "HKG", "LHR").with_schedule(Some(etd), None);
    shipments.upsert(&ctx, &mut tracked).await.expect("Failed to save shipment");
    let mut idle = Shipment::new("SHP-B", customer, ShipmentMode::Air, "HKG", "JFK");
    shipments.upsert(&ctx, &mut idle).await.expect("Failed to save shipment");
    let mut removed = Shipment::new("SHP-C", customer, ShipmentMode::Air, "HKG", "SYD");
    shipments.upsert(&ctx, &mut removed).await.expect("Failed to save shipment");
    shipments.delete(&ctx, &removed.id).await.expect("Delete failed");

    let mut house =
        AirwayBillInfo::new(tracked.id, "176-12345686", "HKG", "LHR").with_parties("Kowloon Exports", "Thames Imports");
    house.is_master = false;
    bills.upsert(&ctx, &mut house).await.expect("Failed to save bill");
    let mut master =
        AirwayBillInfo::new(tracked.id, "176-12345675", "HKG", "LHR").with_parties("HK Consol", "London Consol");
    bills.upsert(&ctx, &mut master).await.expect("Failed to save bill");

    let now = Utc::now();
    let mut batch = vec![
        TimelineEvent::new(tracked.id, "DEP", now - Duration::hours(3)).at("HKG"),
        TimelineEvent::new(tracked.id, "ARR", now).at("LHR"),
    ];
    events.upsert_all(&ctx, &mut batch).await.expect("Failed to save events");

    let mut billed = Invoice::new("INV-1", customer, "USD").for_shipment(tracked.id);
    billed.total_amount = Decimal::new(50_000, 2);
    invoices.upsert(&ctx, &mut billed).await.expect("Failed to save invoice");
    let mut voided = Invoice::new("INV-2", customer, "USD").for_shipment(tracked.id);
    voided.total_amount = Decimal::new(99_900, 2);
    voided.status = InvoiceStatus::Void;
    invoices.upsert(&ctx, &mut voided).await.expect("Failed to save invoice");

    let query = DsrQuery {
        customer_id: customer,
        ..DsrQuery::default()
    };
    let rows = report.daily_status_report(&ctx, &query).await.expect("Report failed");
    let references: Vec<&str> = rows.iter().map(|r| r.reference.as_str()).collect();
    assert_eq!(references, ["SHP-A", "SHP-B"]);

    let row = &rows[0];
    assert_eq!(row.status, ShipmentStatus::Booked);
    assert_eq!(row.awb_number.as_deref(), Some("176-12345675"));
    assert_eq!(row.last_event_code.as_deref(), Some("ARR"));
    assert_eq!(row.last_event_location.as_deref(), Some("LHR"));
    assert_eq!(row.invoiced_total, Decimal::new(50_000, 2));
    assert_eq!(row.invoice_count, 1);

    assert!(rows[1].is_untracked());
    assert!(rows[1].is_unbilled());
    assert!(rows[1].awb_number.is_none());

    let window = DsrQuery {
        etd_from: Some(etd),
        etd_to: Some(etd),
        ..DsrQuery::default()
    };
    let rows = report.daily_status_report(&ctx, &window).await.expect("Report failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].shipment_id, tracked.id);
}
