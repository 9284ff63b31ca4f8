//! # Dashboard Summary
//!
//! Pure reductions over an account's invoices for the dashboard view.
//!
//! ## What Gets Computed
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Dashboard Reductions                                │
//! │                                                                         │
//! │  total_sales   Σ grand total over every invoice                         │
//! │  outstanding   Σ grand total where status is pending or overdue         │
//! │  count         number of invoices                                       │
//! │  monthly       grand totals bucketed by invoice_date month              │
//! │                                                                         │
//! │  Monthly buckets are SPARSE: only months that actually contain an      │
//! │  invoice appear, keyed "YYYY-MM" and sorted ascending. A year with     │
//! │  three billed months produces exactly three buckets.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Buckets follow the invoice date (what the customer was billed under),
//! not the creation timestamp.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Invoice;

// =============================================================================
// Summary Types
// =============================================================================

/// Sales total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlySales {
    /// Month key in "YYYY-MM" form ("2024-06").
    pub month: String,
    /// Σ grand total of invoices dated in that month, in paise.
    pub total_paise: i64,
}

/// The complete dashboard payload for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    /// Σ grand total over every invoice, in paise.
    pub total_sales_paise: i64,
    /// Σ grand total of pending and overdue invoices, in paise.
    pub outstanding_paise: i64,
    /// Number of invoices.
    pub invoice_count: usize,
    /// Sparse per-month sales, sorted ascending by month key.
    pub monthly_sales: Vec<MonthlySales>,
}

// =============================================================================
// Reduction
// =============================================================================

/// Reduces an account's invoices to its dashboard summary.
///
/// Works entirely from the cached invoice totals; no line item is read
/// and nothing is recomputed.
///
/// ## Example
/// ```rust,no_run
/// use finvo_core::dashboard::summarize;
///
/// # let invoices = Vec::new();
/// let summary = summarize(&invoices);
/// assert_eq!(summary.invoice_count, invoices.len());
/// ```
pub fn summarize(invoices: &[Invoice]) -> DashboardSummary {
    let mut total_sales: i64 = 0;
    let mut outstanding: i64 = 0;
    // BTreeMap keeps "YYYY-MM" keys sorted; zero-padded months make the
    // string order the chronological order.
    let mut by_month: BTreeMap<String, i64> = BTreeMap::new();

    for invoice in invoices {
        total_sales += invoice.total_paise;

        if invoice.status.is_outstanding() {
            outstanding += invoice.total_paise;
        }

        let key = invoice.invoice_date.format("%Y-%m").to_string();
        *by_month.entry(key).or_insert(0) += invoice.total_paise;
    }

    DashboardSummary {
        total_sales_paise: total_sales,
        outstanding_paise: outstanding,
        invoice_count: invoices.len(),
        monthly_sales: by_month
            .into_iter()
            .map(|(month, total_paise)| MonthlySales { month, total_paise })
            .collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceStatus;
    use chrono::{NaiveDate, Utc};

    fn invoice(date: &str, status: InvoiceStatus, total_paise: i64) -> Invoice {
        Invoice {
            id: "id".to_string(),
            account_id: "acct".to_string(),
            invoice_number: "INV-001".to_string(),
            customer_name: "Acme Inc.".to_string(),
            customer_email: "contact@acme.com".to_string(),
            customer_phone: "+1-202-555-0143".to_string(),
            invoice_date: date.parse::<NaiveDate>().unwrap(),
            status,
            gst_rate_bps: 1800,
            subtotal_paise: total_paise,
            discount_paise: 0,
            gst_paise: 0,
            total_paise,
            items: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_sales_paise, 0);
        assert_eq!(summary.outstanding_paise, 0);
        assert_eq!(summary.invoice_count, 0);
        assert!(summary.monthly_sales.is_empty());
    }

    #[test]
    fn test_summarize_outstanding_excludes_paid() {
        let invoices = vec![
            invoice("2024-06-01", InvoiceStatus::Paid, 100000),
            invoice("2024-06-02", InvoiceStatus::Pending, 25000),
            invoice("2024-06-03", InvoiceStatus::Overdue, 5000),
        ];
        let summary = summarize(&invoices);
        assert_eq!(summary.total_sales_paise, 130000);
        assert_eq!(summary.outstanding_paise, 30000);
        assert_eq!(summary.invoice_count, 3);
    }

    #[test]
    fn test_summarize_buckets_are_sparse_and_sorted() {
        // Invoices in Feb, Apr and Jun only, given out of order
        let invoices = vec![
            invoice("2024-06-10", InvoiceStatus::Pending, 300),
            invoice("2024-02-28", InvoiceStatus::Paid, 100),
            invoice("2024-04-01", InvoiceStatus::Overdue, 200),
        ];
        let summary = summarize(&invoices);

        let months: Vec<&str> = summary
            .monthly_sales
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2024-02", "2024-04", "2024-06"]);
        // No zero-filled buckets for the silent months
        assert_eq!(summary.monthly_sales.len(), 3);
    }

    #[test]
    fn test_summarize_same_month_accumulates() {
        let invoices = vec![
            invoice("2024-06-01", InvoiceStatus::Paid, 100),
            invoice("2024-06-30", InvoiceStatus::Pending, 250),
        ];
        let summary = summarize(&invoices);
        assert_eq!(summary.monthly_sales.len(), 1);
        assert_eq!(summary.monthly_sales[0].month, "2024-06");
        assert_eq!(summary.monthly_sales[0].total_paise, 350);
    }

    #[test]
    fn test_summarize_year_boundary_order() {
        let invoices = vec![
            invoice("2024-01-05", InvoiceStatus::Paid, 2),
            invoice("2023-12-31", InvoiceStatus::Paid, 1),
        ];
        let summary = summarize(&invoices);
        let months: Vec<&str> = summary
            .monthly_sales
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2023-12", "2024-01"]);
    }
}
