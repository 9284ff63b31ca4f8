//! Invoice workflows: creation, reads, dashboard, insights.
//!
//! ## Creation Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create_invoice(account_id, draft)                      │
//! │                                                                         │
//! │  1. validate the draft           reject ──► ValidationError             │
//! │  2. compute invoice totals       reject ──► ValidationError             │
//! │  3. lock the account             (serializes creation per account)      │
//! │  4. read existing numbers                                               │
//! │  5. derive the next number       malformed numbers skipped + warn!      │
//! │  6. append header + items        one transaction, status Pending        │
//! │  7. unlock                                                              │
//! │                                                                         │
//! │  UNIQUE(account_id, invoice_number) backs the lock: a numbering bug     │
//! │  surfaces as a Conflict, never as a silent duplicate.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 1 and 2 run before the lock is taken; a rejected draft never
//! serializes against other writers.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use finvo_core::dashboard::{summarize, DashboardSummary};
use finvo_core::insights::{analyze_invoices, invoice_digest, render_prompt, InvoiceInsights};
use finvo_core::numbering::next_invoice_number;
use finvo_core::validation::validate_draft;
use finvo_core::{Invoice, InvoiceDraft, InvoiceItem, InvoiceStatus, InvoiceTotals, LineTotals};
use finvo_db::InvoiceRepository;

use crate::error::ApiError;
use crate::state::{AccountLocks, AppState};

/// Digest and prompt pair for callers that bring their own model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsPrompt {
    /// CSV digest of the account's invoices.
    pub digest: String,
    /// Analyst prompt with the digest substituted in.
    pub prompt: String,
}

/// Invoice workflows for one request.
pub struct BillingService {
    invoices: InvoiceRepository,
    locks: AccountLocks,
}

impl BillingService {
    /// Create a billing service over the shared state.
    pub fn new(state: &AppState) -> Self {
        BillingService {
            invoices: state.db.invoices(),
            locks: state.locks.clone(),
        }
    }

    /// Creates an invoice from a draft.
    ///
    /// Validates, computes totals, derives the next number under the
    /// account's creation lock, and appends header plus items in one
    /// transaction. New invoices always start as `Pending`.
    pub async fn create_invoice(
        &self,
        account_id: &str,
        draft: InvoiceDraft,
    ) -> Result<Invoice, ApiError> {
        validate_draft(&draft)?;
        let totals = InvoiceTotals::compute(&draft.items, draft.gst_rate())?;

        // Number derivation and append must not interleave with another
        // create for the same account
        let _guard = self.locks.lock(account_id).await;

        let numbers = self.invoices.list_numbers(account_id).await?;
        let next = next_invoice_number(&numbers);
        for raw in &next.skipped {
            warn!(account_id, number = %raw, "Skipping malformed invoice number");
        }

        let invoice = build_invoice(account_id, &draft, &totals, next.number)?;
        self.invoices.append(&invoice).await?;

        info!(
            account_id,
            invoice_id = %invoice.id,
            number = %invoice.invoice_number,
            total = %invoice.total(),
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Lists the account's invoices, newest invoice date first.
    pub async fn list_invoices(&self, account_id: &str) -> Result<Vec<Invoice>, ApiError> {
        Ok(self.invoices.list(account_id).await?)
    }

    /// Fetches one invoice by storage id.
    pub async fn get_invoice(&self, account_id: &str, id: &str) -> Result<Invoice, ApiError> {
        self.invoices
            .get_by_id(account_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Invoice", id))
    }

    /// Reduces the account's invoices to the dashboard summary.
    pub async fn dashboard(&self, account_id: &str) -> Result<DashboardSummary, ApiError> {
        let invoices = self.invoices.list(account_id).await?;
        Ok(summarize(&invoices))
    }

    /// Runs the built-in heuristic analysis.
    pub async fn insights(&self, account_id: &str) -> Result<InvoiceInsights, ApiError> {
        let invoices = self.invoices.list(account_id).await?;
        Ok(analyze_invoices(&invoices))
    }

    /// Renders the digest and prompt for external analysis.
    pub async fn insights_prompt(&self, account_id: &str) -> Result<InsightsPrompt, ApiError> {
        let invoices = self.invoices.list(account_id).await?;
        let digest = invoice_digest(&invoices);
        let prompt = render_prompt(&digest);
        Ok(InsightsPrompt { digest, prompt })
    }
}

/// Assembles the persisted invoice from a validated draft.
///
/// Ids are fresh UUIDs; line amounts and invoice totals are frozen here
/// and never recomputed on read.
fn build_invoice(
    account_id: &str,
    draft: &InvoiceDraft,
    totals: &InvoiceTotals,
    invoice_number: String,
) -> Result<Invoice, ApiError> {
    let invoice_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut items = Vec::with_capacity(draft.items.len());
    for (position, line) in draft.items.iter().enumerate() {
        let line_totals = LineTotals::compute(line)?;
        items.push(InvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.clone(),
            position: position as i64,
            description: line.description.clone(),
            quantity: line.quantity,
            unit_price_paise: line.unit_price_paise,
            discount_bps: line.discount_bps,
            gross_paise: line_totals.gross_paise,
            discount_paise: line_totals.discount_paise,
            net_paise: line_totals.net_paise,
        });
    }

    Ok(Invoice {
        id: invoice_id,
        account_id: account_id.to_string(),
        invoice_number,
        customer_name: draft.customer_name.clone(),
        customer_email: draft.customer_email.clone(),
        customer_phone: draft.customer_phone.clone(),
        invoice_date: draft.invoice_date,
        status: InvoiceStatus::Pending,
        gst_rate_bps: draft.gst_rate_bps,
        subtotal_paise: totals.subtotal_paise,
        discount_paise: totals.discount_paise,
        gst_paise: totals.gst_paise,
        total_paise: totals.total_paise,
        items,
        created_at: now,
        updated_at: now,
    })
}
