//! # Billing Workflow Tests
//!
//! Drives `BillingService` against an in-memory database: sequential
//! numbering, concurrent creation, per-account isolation, recovery from
//! malformed numbers, and the read paths (list, get, dashboard,
//! insights).

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use finvo_core::{
    Account, Invoice, InvoiceDraft, InvoiceItem, InvoiceStatus, LineItemDraft,
    ANONYMOUS_ACCOUNT_ID,
};
use finvo_db::{Database, DbConfig};
use finvo_server::config::ServerConfig;
use finvo_server::error::ErrorCode;
use finvo_server::services::billing::BillingService;
use finvo_server::AppState;

/// Helper: fresh state over an isolated in-memory database.
async fn test_state() -> AppState {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let config = ServerConfig {
        http_port: 0,
        database_path: ":memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_access_lifetime_secs: 3600,
        jwt_refresh_lifetime_secs: 604800,
    };
    AppState::new(db, config)
}

/// Helper: insert an account row so invoices can reference it.
async fn make_account(state: &AppState, email: &str) -> String {
    let account = Account {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        display_name: "Test".to_string(),
        password_hash: "!".to_string(),
        created_at: Utc::now(),
    };
    state.db.accounts().create(&account).await.unwrap();
    account.id
}

/// The reference draft: web work plus hosting at 10% off, 18% GST.
fn reference_draft() -> InvoiceDraft {
    InvoiceDraft {
        customer_name: "Acme Inc.".to_string(),
        customer_email: "contact@acme.com".to_string(),
        customer_phone: "+1-202-555-0143".to_string(),
        invoice_date: date(2024, 6, 1),
        gst_rate_bps: 1800,
        items: vec![
            LineItemDraft {
                description: "Web Development Services".to_string(),
                quantity: 1,
                unit_price_paise: 500000,
                discount_bps: 0,
            },
            LineItemDraft {
                description: "Hosting (1 year)".to_string(),
                quantity: 1,
                unit_price_paise: 30000,
                discount_bps: 1000,
            },
        ],
    }
}

/// A stored invoice with a chosen number, date, status and total, for
/// seeding the repository directly.
fn stored_invoice(
    account_id: &str,
    number: &str,
    invoice_date: NaiveDate,
    status: InvoiceStatus,
    total_paise: i64,
) -> Invoice {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    Invoice {
        id: id.clone(),
        account_id: account_id.to_string(),
        invoice_number: number.to_string(),
        customer_name: "Acme Inc.".to_string(),
        customer_email: "contact@acme.com".to_string(),
        customer_phone: "+1-202-555-0143".to_string(),
        invoice_date,
        status,
        gst_rate_bps: 0,
        subtotal_paise: total_paise,
        discount_paise: 0,
        gst_paise: 0,
        total_paise,
        items: vec![InvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: id,
            position: 0,
            description: "Consulting".to_string(),
            quantity: 1,
            unit_price_paise: total_paise,
            discount_bps: 0,
            gross_paise: total_paise,
            discount_paise: 0,
            net_paise: total_paise,
        }],
        created_at: now,
        updated_at: now,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// -- Creation -----------------------------------------------------------------

#[tokio::test]
async fn test_create_assigns_sequential_numbers() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    let first = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();
    let second = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();

    assert_eq!(first.invoice_number, "INV-001");
    assert_eq!(second.invoice_number, "INV-002");
    assert_eq!(first.status, InvoiceStatus::Pending);
    assert_eq!(second.status, InvoiceStatus::Pending);
}

#[tokio::test]
async fn test_create_freezes_reference_totals() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    let invoice = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();

    assert_eq!(invoice.subtotal_paise, 530000);
    assert_eq!(invoice.discount_paise, 3000);
    assert_eq!(invoice.gst_paise, 94860);
    assert_eq!(invoice.total_paise, 621860);

    // Per-line amounts are frozen alongside the header
    assert_eq!(invoice.items.len(), 2);
    assert_eq!(invoice.items[0].position, 0);
    assert_eq!(invoice.items[0].net_paise, 500000);
    assert_eq!(invoice.items[1].discount_paise, 3000);
    assert_eq!(invoice.items[1].net_paise, 27000);

    // And read back identically
    let fetched = billing
        .get_invoice(ANONYMOUS_ACCOUNT_ID, &invoice.id)
        .await
        .unwrap();
    assert_eq!(fetched.total_paise, 621860);
    assert_eq!(fetched.items.len(), 2);
}

#[tokio::test]
async fn test_rejected_draft_persists_nothing() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    let mut draft = reference_draft();
    draft.items.clear();

    let err = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, draft)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let invoices = billing.list_invoices(ANONYMOUS_ACCOUNT_ID).await.unwrap();
    assert!(invoices.is_empty());
}

#[tokio::test]
async fn test_rejected_line_is_validation_error() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    let mut draft = reference_draft();
    draft.items[0].quantity = 0;

    let err = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, draft)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

// -- Numbering Under Concurrency ----------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_never_collide() {
    let state = test_state().await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            BillingService::new(&state)
                .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
                .await
                .unwrap()
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap().invoice_number);
    }
    numbers.sort();

    assert_eq!(numbers, vec!["INV-001", "INV-002", "INV-003", "INV-004"]);
}

// -- Account Isolation --------------------------------------------------------

#[tokio::test]
async fn test_accounts_have_independent_series() {
    let state = test_state().await;
    let billing = BillingService::new(&state);
    let other = make_account(&state, "other@example.com").await;

    let anon = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();
    let theirs = billing.create_invoice(&other, reference_draft()).await.unwrap();

    // Both series start at 001; neither account sees the other's invoice
    assert_eq!(anon.invoice_number, "INV-001");
    assert_eq!(theirs.invoice_number, "INV-001");
    assert_eq!(billing.list_invoices(ANONYMOUS_ACCOUNT_ID).await.unwrap().len(), 1);
    assert_eq!(billing.list_invoices(&other).await.unwrap().len(), 1);

    let err = billing
        .get_invoice(&other, &anon.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// -- Malformed Numbers --------------------------------------------------------

#[tokio::test]
async fn test_malformed_numbers_are_skipped() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    // An imported invoice whose number the sequencer cannot parse
    state
        .db
        .invoices()
        .append(&stored_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "LEGACY-7",
            date(2024, 1, 10),
            InvoiceStatus::Paid,
            100000,
        ))
        .await
        .unwrap();

    let first = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();
    assert_eq!(first.invoice_number, "INV-001");

    // A later valid number wins over the malformed one
    state
        .db
        .invoices()
        .append(&stored_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-007",
            date(2024, 2, 1),
            InvoiceStatus::Paid,
            50000,
        ))
        .await
        .unwrap();

    let next = billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();
    assert_eq!(next.invoice_number, "INV-008");
}

// -- Reads --------------------------------------------------------------------

#[tokio::test]
async fn test_get_unknown_invoice_is_not_found() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    let err = billing
        .get_invoice(ANONYMOUS_ACCOUNT_ID, "no-such-id")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_list_orders_newest_invoice_date_first() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    let mut march = reference_draft();
    march.invoice_date = date(2024, 3, 5);
    let mut june = reference_draft();
    june.invoice_date = date(2024, 6, 5);

    billing.create_invoice(ANONYMOUS_ACCOUNT_ID, march).await.unwrap();
    billing.create_invoice(ANONYMOUS_ACCOUNT_ID, june).await.unwrap();

    let invoices = billing.list_invoices(ANONYMOUS_ACCOUNT_ID).await.unwrap();
    let dates: Vec<NaiveDate> = invoices.iter().map(|i| i.invoice_date).collect();
    assert_eq!(dates, vec![date(2024, 6, 5), date(2024, 3, 5)]);
}

// -- Dashboard ----------------------------------------------------------------

#[tokio::test]
async fn test_dashboard_reduces_stored_invoices() {
    let state = test_state().await;
    let billing = BillingService::new(&state);
    let repo = state.db.invoices();

    repo.append(&stored_invoice(
        ANONYMOUS_ACCOUNT_ID,
        "INV-001",
        date(2024, 4, 5),
        InvoiceStatus::Paid,
        100000,
    ))
    .await
    .unwrap();
    repo.append(&stored_invoice(
        ANONYMOUS_ACCOUNT_ID,
        "INV-002",
        date(2024, 6, 1),
        InvoiceStatus::Pending,
        25000,
    ))
    .await
    .unwrap();
    repo.append(&stored_invoice(
        ANONYMOUS_ACCOUNT_ID,
        "INV-003",
        date(2024, 6, 20),
        InvoiceStatus::Overdue,
        5000,
    ))
    .await
    .unwrap();

    let summary = billing.dashboard(ANONYMOUS_ACCOUNT_ID).await.unwrap();

    assert_eq!(summary.total_sales_paise, 130000);
    assert_eq!(summary.outstanding_paise, 30000);
    assert_eq!(summary.invoice_count, 3);

    let months: Vec<(&str, i64)> = summary
        .monthly_sales
        .iter()
        .map(|m| (m.month.as_str(), m.total_paise))
        .collect();
    assert_eq!(months, vec![("2024-04", 100000), ("2024-06", 30000)]);
}

#[tokio::test]
async fn test_dashboard_empty_account() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    let summary = billing.dashboard(ANONYMOUS_ACCOUNT_ID).await.unwrap();

    assert_eq!(summary.total_sales_paise, 0);
    assert_eq!(summary.outstanding_paise, 0);
    assert_eq!(summary.invoice_count, 0);
    assert!(summary.monthly_sales.is_empty());
}

// -- Insights -----------------------------------------------------------------

#[tokio::test]
async fn test_insights_prompt_embeds_account_digest() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();

    let bundle = billing.insights_prompt(ANONYMOUS_ACCOUNT_ID).await.unwrap();

    assert!(bundle
        .digest
        .starts_with("invoice_number,customer_name,invoice_date,status,total"));
    assert!(bundle.digest.contains("INV-001"));
    assert!(bundle.digest.contains("Acme Inc."));
    assert!(bundle.prompt.contains(&bundle.digest));
}

#[tokio::test]
async fn test_insights_reports_on_stored_invoices() {
    let state = test_state().await;
    let billing = BillingService::new(&state);

    billing
        .create_invoice(ANONYMOUS_ACCOUNT_ID, reference_draft())
        .await
        .unwrap();

    let insights = billing.insights(ANONYMOUS_ACCOUNT_ID).await.unwrap();

    // One pending invoice: the follow-up suggestion must mention it
    assert!(!insights.sales_trends.is_empty());
    assert!(insights.customer_behavior.contains("Acme Inc."));
    assert!(insights.revenue_opportunities.contains("pending"));
}
