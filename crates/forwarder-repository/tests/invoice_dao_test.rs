//! Integration tests for the invoice DAOs and invoice number allocation.
//!
//! These tests run against a real Postgres database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::NaiveDate;
use common::TestDatabase;
use forwarder_config::TenancyConfig;
use forwarder_domain::{Invoice, InvoiceLineItem, InvoiceStatus, LineItemExchangeRate, DEFAULT_INVOICE_SEQUENCE};
use forwarder_repository::{
    CrudDao, InvoiceDao, InvoiceLineItemDao, InvoiceQuery, InvoiceSequenceDao, LineItemExchangeRateDao,
    PgInvoiceDao, PgInvoiceLineItemDao, PgInvoiceSequenceDao, PgLineItemExchangeRateDao,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_first_number_creates_sequence() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let dao = PgInvoiceSequenceDao::from_config(db.pool(), &TenancyConfig::default()).expect("Bad config");

    let first = dao.new_invoice_number(&ctx, DEFAULT_INVOICE_SEQUENCE).await.expect("Allocation failed");
    let second = dao.new_invoice_number(&ctx, DEFAULT_INVOICE_SEQUENCE).await.expect("Allocation failed");

    assert_eq!(first, "INV-000001");
    assert_eq!(second, "INV-000002");

    let sequence = dao.get_by_name(&ctx, DEFAULT_INVOICE_SEQUENCE).await.expect("Sequence missing");
    assert_eq!(sequence.last_value, 2);
    assert_eq!(sequence.audit.created_by, ctx.actor());
}

#[tokio::test]
async fn test_stored_sequence_format_wins() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let dao = PgInvoiceSequenceDao::new(db.pool(), "INV-", 6);

    let mut sequence = forwarder_domain::InvoiceSequence::new("credit", "CN/", 4);
    sequence.last_value = 41;
    dao.upsert(&ctx, &mut sequence).await.expect("Failed to save sequence");

    let number = dao.new_invoice_number(&ctx, "credit").await.expect("Allocation failed");
    assert_eq!(number, "CN/0042");
}

#[tokio::test]
async fn test_sequence_renamed_by_id() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let dao = PgInvoiceSequenceDao::new(db.pool(), "INV-", 6);

    dao.new_invoice_number(&ctx, "credit").await.expect("Allocation failed");
    let mut sequence = dao.get_by_name(&ctx, "credit").await.expect("Sequence missing");
    sequence.name = "credit_note".to_string();
    let renamed = dao.upsert(&ctx, &mut sequence).await.expect("Failed to rename sequence");

    assert_eq!(renamed.name, "credit_note");
    assert!(dao.get_by_name(&ctx, "credit").await.unwrap_err().is_not_found());
    let number = dao.new_invoice_number(&ctx, "credit_note").await.expect("Allocation failed");
    assert_eq!(number, "INV-000002");
}

#[tokio::test]
async fn test_blank_sequence_name_rejected() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let dao = PgInvoiceSequenceDao::new(db.pool(), "INV-", 6);

    let err = dao.new_invoice_number(&ctx, "  ").await.unwrap_err();
    assert!(matches!(err, forwarder_core::ForwarderError::Validation(_)));
}

#[tokio::test]
async fn test_concurrent_numbers_are_unique() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let dao = Arc::new(PgInvoiceSequenceDao::new(db.pool(), "INV-", 6));

    let calls = (0..40).map(|_| {
        let dao = Arc::clone(&dao);
        let ctx = ctx.clone();
        tokio::spawn(async move { dao.new_invoice_number(&ctx, DEFAULT_INVOICE_SEQUENCE).await })
    });
    let numbers: Vec<String> = futures::future::join_all(calls)
        .await
        .into_iter()
        .map(|joined| joined.expect("Task panicked").expect("Allocation failed"))
        .collect();

    let unique: HashSet<&String> = numbers.iter().collect();
    assert_eq!(unique.len(), 40);
    assert!(numbers.contains(&"INV-000001".to_string()));
    assert!(numbers.contains(&"INV-000040".to_string()));
}

#[tokio::test]
async fn test_invoice_written_in_one_transaction() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let sequences = PgInvoiceSequenceDao::new(db.pool(), "INV-", 6);
    let invoices = PgInvoiceDao::new(db.pool());
    let lines = PgInvoiceLineItemDao::new(db.pool());
    let rates = PgLineItemExchangeRateDao::new(db.pool());

    let customer = Uuid::now_v7();
    let mut tx = db.pool().inner().begin().await.expect("Failed to begin");

    let number = sequences
        .new_invoice_number_in(&mut tx, &ctx, DEFAULT_INVOICE_SEQUENCE)
        .await
        .expect("Allocation failed");
    let mut invoice = Invoice::new(number, customer, "EUR");
    invoices.upsert_in(&mut tx, &ctx, &mut invoice).await.expect("Failed to save invoice");

    let mut items = vec![
        InvoiceLineItem::new(invoice.id, 1, "Air freight", Decimal::new(1200, 1), Decimal::new(250, 2), "USD"),
        InvoiceLineItem::new(invoice.id, 2, "Handling", Decimal::ONE, Decimal::new(4500, 2), "EUR"),
    ];
    lines.upsert_all_in(&mut tx, &ctx, &mut items).await.expect("Failed to save lines");

    let mut rate = LineItemExchangeRate::new(
        items[0].id,
        "USD",
        "EUR",
        Decimal::new(9200, 4),
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
    );
    rates.upsert_in(&mut tx, &ctx, &mut rate).await.expect("Failed to save rate");

    let staged = lines.list_for_invoice_in(&mut tx, &ctx, invoice.id).await.expect("Failed to list lines");
    assert_eq!(staged.len(), 2);
    tx.commit().await.expect("Failed to commit");

    let stored = invoices.get_by_number(&ctx, "INV-000001").await.expect("Invoice missing");
    assert_eq!(stored.id, invoice.id);

    let listed = lines.list_for_invoice(&ctx, invoice.id).await.expect("Failed to list lines");
    assert_eq!(listed.iter().map(|l| l.line_number).collect::<Vec<_>>(), [1, 2]);
    assert_eq!(listed[0].amount, Decimal::new(30000, 2));

    let found = rates.get_for_line_item(&ctx, items[0].id).await.expect("Rate missing");
    assert_eq!(found.convert(listed[0].amount), Decimal::new(27600, 2));

    let all_rates = rates.list_for_line_items(&ctx, &[]).await.expect("Failed to list rates");
    assert_eq!(all_rates.len(), 1);
}

#[tokio::test]
async fn test_rolled_back_invoice_leaves_nothing() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let sequences = PgInvoiceSequenceDao::new(db.pool(), "INV-", 6);
    let invoices = PgInvoiceDao::new(db.pool());

    {
        let mut tx = db.pool().inner().begin().await.expect("Failed to begin");
        let number = sequences
            .new_invoice_number_in(&mut tx, &ctx, DEFAULT_INVOICE_SEQUENCE)
            .await
            .expect("Allocation failed");
        let mut invoice = Invoice::new(number, Uuid::now_v7(), "EUR");
        invoices.upsert_in(&mut tx, &ctx, &mut invoice).await.expect("Failed to save invoice");
        tx.rollback().await.expect("Failed to roll back");
    }

    assert_eq!(invoices.count(&ctx, &InvoiceQuery::default()).await.expect("Count failed"), 0);
    let number = sequences
        .new_invoice_number(&ctx, DEFAULT_INVOICE_SEQUENCE)
        .await
        .expect("Allocation failed");
    assert_eq!(number, "INV-000001");
}

#[tokio::test]
async fn test_invoice_soft_delete_and_status_filter() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let invoices = PgInvoiceDao::new(db.pool());
    let customer = Uuid::now_v7();

    let mut draft = Invoice::new("INV-100001", customer, "USD");
    invoices.upsert(&ctx, &mut draft).await.expect("Failed to save invoice");
    let mut issued = Invoice::new("INV-100002", customer, "USD");
    issued.status = InvoiceStatus::Issued;
    invoices.upsert(&ctx, &mut issued).await.expect("Failed to save invoice");

    let query = InvoiceQuery {
        customer_id: customer,
        status: Some(InvoiceStatus::Issued),
        ..InvoiceQuery::default()
    };
    let found = invoices.get_all(&ctx, &query).await.expect("Failed to list invoices");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].invoice_number, "INV-100002");

    assert!(invoices.delete(&ctx, &draft.id).await.expect("Delete failed"));
    assert!(invoices.get_by_number(&ctx, "INV-100001").await.unwrap_err().is_not_found());
    let remaining = invoices
        .count(&ctx, &InvoiceQuery { customer_id: customer, ..InvoiceQuery::default() })
        .await
        .expect("Count failed");
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn test_line_items_hard_deleted() {
    let db = TestDatabase::new().await;
    let ctx = db.tenant("acme").await;
    let invoices = PgInvoiceDao::new(db.pool());
    let lines = PgInvoiceLineItemDao::new(db.pool());

    let mut invoice = Invoice::new("INV-200001", Uuid::now_v7(), "USD");
    invoices.upsert(&ctx, &mut invoice).await.expect("Failed to save invoice");
    let mut line = InvoiceLineItem::new(invoice.id, 1, "Storage", Decimal::TWO, Decimal::TEN, "USD");
    lines.upsert(&ctx, &mut line).await.expect("Failed to save line");

    assert!(lines.delete(&ctx, &line.id).await.expect("Delete failed"));
    assert!(lines.get_by_id(&ctx, &line.id).await.unwrap_err().is_not_found());

    let remaining: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "acme".invoice_line_item"#)
        .fetch_one(db.pool().inner())
        .await
        .expect("Count failed");
    assert_eq!(remaining, 0);
}
