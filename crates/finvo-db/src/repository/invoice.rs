//! # Invoice Repository
//!
//! Database operations for invoices and their line items.
//!
//! ## Store Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Append-Only Invoice Store                           │
//! │                                                                         │
//! │  1. APPEND                                                             │
//! │     └── append(invoice) → header + items in ONE transaction            │
//! │         (UNIQUE(account_id, invoice_number) rejects duplicates)        │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list(account_id)         → newest first, items attached        │
//! │     └── get_by_id(account_id,id) → Option<Invoice>                     │
//! │     └── list_numbers(account_id) → numbers for the sequencer           │
//! │                                                                         │
//! │  There is no update or delete. Totals are frozen at creation and an    │
//! │  appended invoice is visible to every subsequent read.                 │
//! │                                                                         │
//! │  Every operation takes account_id: one account can never see or       │
//! │  collide with another account's invoices.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use finvo_core::{Invoice, InvoiceItem, InvoiceStatus};

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Appends a complete invoice (header plus items) in one transaction.
    ///
    /// The caller assigns ids, the invoice number and the cached totals
    /// before calling; the repository only persists. A duplicate invoice
    /// number within the account fails the whole transaction with
    /// `DbError::UniqueViolation`, items included.
    pub async fn append(&self, invoice: &Invoice) -> DbResult<()> {
        debug!(
            id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            items = invoice.items.len(),
            "Appending invoice"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, account_id, invoice_number,
                customer_name, customer_email, customer_phone,
                invoice_date, status, gst_rate_bps,
                subtotal_paise, discount_paise, gst_paise, total_paise,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12, ?13,
                ?14, ?15
            )
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.account_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.customer_name)
        .bind(&invoice.customer_email)
        .bind(&invoice.customer_phone)
        .bind(invoice.invoice_date)
        .bind(invoice.status)
        .bind(invoice.gst_rate_bps)
        .bind(invoice.subtotal_paise)
        .bind(invoice.discount_paise)
        .bind(invoice.gst_paise)
        .bind(invoice.total_paise)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &invoice.items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id, position, description, quantity,
                    unit_price_paise, discount_bps,
                    gross_paise, discount_paise, net_paise
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5,
                    ?6, ?7,
                    ?8, ?9, ?10
                )
                "#,
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(item.position)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price_paise)
            .bind(item.discount_bps)
            .bind(item.gross_paise)
            .bind(item.discount_paise)
            .bind(item.net_paise)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Lists all invoices for an account, newest invoice date first.
    ///
    /// Invoices sharing a date fall back to creation order, newest first.
    /// Items are attached to each invoice in entry order.
    pub async fn list(&self, account_id: &str) -> DbResult<Vec<Invoice>> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, invoice_number,
                   customer_name, customer_email, customer_phone,
                   invoice_date, status, gst_rate_bps,
                   subtotal_paise, discount_paise, gst_paise, total_paise,
                   created_at, updated_at
            FROM invoices
            WHERE account_id = ?1
            ORDER BY invoice_date DESC, created_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        // One batched item query instead of one per invoice.
        let item_rows: Vec<InvoiceItemRow> = sqlx::query_as(
            r#"
            SELECT i.id, i.invoice_id, i.position, i.description, i.quantity,
                   i.unit_price_paise, i.discount_bps,
                   i.gross_paise, i.discount_paise, i.net_paise
            FROM invoice_items i
            JOIN invoices inv ON inv.id = i.invoice_id
            WHERE inv.account_id = ?1
            ORDER BY i.invoice_id, i.position
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_invoice: HashMap<String, Vec<InvoiceItem>> = HashMap::new();
        for row in item_rows {
            items_by_invoice
                .entry(row.invoice_id.clone())
                .or_default()
                .push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_invoice.remove(&row.id).unwrap_or_default();
                row.into_invoice(items)
            })
            .collect())
    }

    /// Gets an invoice by ID, scoped to the owning account.
    ///
    /// Returns `Ok(None)` both when the id does not exist and when it
    /// belongs to a different account; callers cannot tell the two apart.
    pub async fn get_by_id(&self, account_id: &str, id: &str) -> DbResult<Option<Invoice>> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, invoice_number,
                   customer_name, customer_email, customer_phone,
                   invoice_date, status, gst_rate_bps,
                   subtotal_paise, discount_paise, gst_paise, total_paise,
                   created_at, updated_at
            FROM invoices
            WHERE account_id = ?1 AND id = ?2
            "#,
        )
        .bind(account_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let items = self.items_for(&row.id).await?;
        Ok(Some(row.into_invoice(items)))
    }

    /// Lists every invoice number in an account, in no particular order.
    ///
    /// Input for the numbering sequencer, which takes the maximum of the
    /// parseable numbers. Malformed numbers are returned too; skipping
    /// them is the sequencer's call, not the store's.
    pub async fn list_numbers(&self, account_id: &str) -> DbResult<Vec<String>> {
        let numbers: Vec<String> =
            sqlx::query_scalar("SELECT invoice_number FROM invoices WHERE account_id = ?1")
                .bind(account_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(numbers)
    }

    /// Counts the invoices in an account.
    pub async fn count(&self, account_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE account_id = ?1")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets all items for one invoice, in entry order.
    async fn items_for(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let rows: Vec<InvoiceItemRow> = sqlx::query_as(
            r#"
            SELECT id, invoice_id, position, description, quantity,
                   unit_price_paise, discount_bps,
                   gross_paise, discount_paise, net_paise
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InvoiceItem::from).collect())
    }
}

// =============================================================================
// Row Types
// =============================================================================

/// Flat invoice header row as stored. Items live in their own table and
/// are attached when the row is read back.
#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    account_id: String,
    invoice_number: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    invoice_date: NaiveDate,
    status: InvoiceStatus,
    gst_rate_bps: u32,
    subtotal_paise: i64,
    discount_paise: i64,
    gst_paise: i64,
    total_paise: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self, items: Vec<InvoiceItem>) -> Invoice {
        Invoice {
            id: self.id,
            account_id: self.account_id,
            invoice_number: self.invoice_number,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            invoice_date: self.invoice_date,
            status: self.status,
            gst_rate_bps: self.gst_rate_bps,
            subtotal_paise: self.subtotal_paise,
            discount_paise: self.discount_paise,
            gst_paise: self.gst_paise,
            total_paise: self.total_paise,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct InvoiceItemRow {
    id: String,
    invoice_id: String,
    position: i64,
    description: String,
    quantity: i64,
    unit_price_paise: i64,
    discount_bps: u32,
    gross_paise: i64,
    discount_paise: i64,
    net_paise: i64,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            position: row.position,
            description: row.description,
            quantity: row.quantity,
            unit_price_paise: row.unit_price_paise,
            discount_bps: row.discount_bps,
            gross_paise: row.gross_paise,
            discount_paise: row.discount_paise,
            net_paise: row.net_paise,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use finvo_core::{Account, ANONYMOUS_ACCOUNT_ID};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Inserts an account row so invoices can reference it.
    async fn make_account(db: &Database, email: &str) -> String {
        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: "Test".to_string(),
            password_hash: "!".to_string(),
            created_at: Utc::now(),
        };
        db.accounts().create(&account).await.unwrap();
        account.id
    }

    /// The reference invoice: web work + discounted hosting, 18% GST.
    fn sample_invoice(account_id: &str, number: &str, date: NaiveDate) -> Invoice {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        Invoice {
            id: id.clone(),
            account_id: account_id.to_string(),
            invoice_number: number.to_string(),
            customer_name: "Acme Inc.".to_string(),
            customer_email: "contact@acme.com".to_string(),
            customer_phone: "+1-202-555-0143".to_string(),
            invoice_date: date,
            status: InvoiceStatus::Pending,
            gst_rate_bps: 1800,
            subtotal_paise: 530000,
            discount_paise: 3000,
            gst_paise: 94860,
            total_paise: 621860,
            items: vec![
                InvoiceItem {
                    id: Uuid::new_v4().to_string(),
                    invoice_id: id.clone(),
                    position: 0,
                    description: "Web Development Services".to_string(),
                    quantity: 1,
                    unit_price_paise: 500000,
                    discount_bps: 0,
                    gross_paise: 500000,
                    discount_paise: 0,
                    net_paise: 500000,
                },
                InvoiceItem {
                    id: Uuid::new_v4().to_string(),
                    invoice_id: id,
                    position: 1,
                    description: "Hosting (1 year)".to_string(),
                    quantity: 1,
                    unit_price_paise: 30000,
                    discount_bps: 1000,
                    gross_paise: 30000,
                    discount_paise: 3000,
                    net_paise: 27000,
                },
            ],
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_append_then_read_round_trip() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = sample_invoice(ANONYMOUS_ACCOUNT_ID, "INV-001", date(2024, 6, 1));
        repo.append(&invoice).await.unwrap();

        let fetched = repo
            .get_by_id(ANONYMOUS_ACCOUNT_ID, &invoice.id)
            .await
            .unwrap()
            .expect("appended invoice must be readable");

        assert_eq!(fetched.invoice_number, "INV-001");
        assert_eq!(fetched.customer_name, "Acme Inc.");
        assert_eq!(fetched.invoice_date, date(2024, 6, 1));
        assert_eq!(fetched.status, InvoiceStatus::Pending);
        assert_eq!(fetched.gst_rate_bps, 1800);
        assert_eq!(fetched.total_paise, 621860);
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.items[0].description, "Web Development Services");
        assert_eq!(fetched.items[1].discount_paise, 3000);
    }

    #[tokio::test]
    async fn test_items_come_back_in_entry_order() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = sample_invoice(ANONYMOUS_ACCOUNT_ID, "INV-001", date(2024, 6, 1));
        repo.append(&invoice).await.unwrap();

        let fetched = repo
            .get_by_id(ANONYMOUS_ACCOUNT_ID, &invoice.id)
            .await
            .unwrap()
            .unwrap();

        let positions: Vec<i64> = fetched.items.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_list_orders_newest_date_first() {
        let db = test_db().await;
        let repo = db.invoices();

        repo.append(&sample_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-001",
            date(2024, 4, 1),
        ))
        .await
        .unwrap();
        repo.append(&sample_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-002",
            date(2024, 6, 1),
        ))
        .await
        .unwrap();
        repo.append(&sample_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-003",
            date(2024, 5, 15),
        ))
        .await
        .unwrap();

        let invoices = repo.list(ANONYMOUS_ACCOUNT_ID).await.unwrap();
        let numbers: Vec<&str> = invoices.iter().map(|i| i.invoice_number.as_str()).collect();
        assert_eq!(numbers, vec!["INV-002", "INV-003", "INV-001"]);

        // Items survive the batched fetch
        assert!(invoices.iter().all(|i| i.items.len() == 2));
    }

    #[tokio::test]
    async fn test_get_by_id_is_account_scoped() {
        let db = test_db().await;
        let repo = db.invoices();
        let other = make_account(&db, "other@example.com").await;

        let invoice = sample_invoice(ANONYMOUS_ACCOUNT_ID, "INV-001", date(2024, 6, 1));
        repo.append(&invoice).await.unwrap();

        // The owner sees it, the other account does not.
        assert!(repo
            .get_by_id(ANONYMOUS_ACCOUNT_ID, &invoice.id)
            .await
            .unwrap()
            .is_some());
        assert!(repo.get_by_id(&other, &invoice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_accounts_are_isolated() {
        let db = test_db().await;
        let repo = db.invoices();
        let other = make_account(&db, "other@example.com").await;

        repo.append(&sample_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-001",
            date(2024, 6, 1),
        ))
        .await
        .unwrap();
        // The same number in a different account is fine.
        repo.append(&sample_invoice(&other, "INV-001", date(2024, 6, 2)))
            .await
            .unwrap();

        assert_eq!(repo.list(ANONYMOUS_ACCOUNT_ID).await.unwrap().len(), 1);
        assert_eq!(repo.list(&other).await.unwrap().len(), 1);
        assert_eq!(
            repo.list_numbers(&other).await.unwrap(),
            vec!["INV-001".to_string()]
        );
    }

    #[tokio::test]
    async fn test_duplicate_number_in_same_account_rejected() {
        let db = test_db().await;
        let repo = db.invoices();

        repo.append(&sample_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-001",
            date(2024, 6, 1),
        ))
        .await
        .unwrap();

        let err = repo
            .append(&sample_invoice(
                ANONYMOUS_ACCOUNT_ID,
                "INV-001",
                date(2024, 6, 2),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The failed transaction must not leave orphan items behind.
        let invoices = repo.list(ANONYMOUS_ACCOUNT_ID).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].items.len(), 2);
    }

    #[tokio::test]
    async fn test_list_numbers_and_count() {
        let db = test_db().await;
        let repo = db.invoices();

        assert_eq!(repo.count(ANONYMOUS_ACCOUNT_ID).await.unwrap(), 0);
        assert!(repo.list_numbers(ANONYMOUS_ACCOUNT_ID).await.unwrap().is_empty());

        repo.append(&sample_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-001",
            date(2024, 6, 1),
        ))
        .await
        .unwrap();
        repo.append(&sample_invoice(
            ANONYMOUS_ACCOUNT_ID,
            "INV-003",
            date(2024, 6, 2),
        ))
        .await
        .unwrap();

        let mut numbers = repo.list_numbers(ANONYMOUS_ACCOUNT_ID).await.unwrap();
        numbers.sort();
        assert_eq!(numbers, vec!["INV-001".to_string(), "INV-003".to_string()]);
        assert_eq!(repo.count(ANONYMOUS_ACCOUNT_ID).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_account_fk_rejected() {
        let db = test_db().await;
        let repo = db.invoices();

        let err = repo
            .append(&sample_invoice("no-such-account", "INV-001", date(2024, 6, 1)))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
