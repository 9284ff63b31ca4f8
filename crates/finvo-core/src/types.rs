//! # Domain Types
//!
//! Core domain types used throughout Finvo.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │  InvoiceItem    │   │    Account      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  invoice_number │   │  invoice_id(FK) │   │  email          │       │
//! │  │  status         │   │  description    │   │  display_name   │       │
//! │  │  total_paise    │   │  net_paise      │   │  password_hash  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    GstRate      │   │ InvoiceStatus   │   │  InvoiceDraft   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Paid           │   │  pre-save form  │       │
//! │  │  1800 = 18%     │   │  Pending        │   │  + line drafts  │       │
//! │  └─────────────────┘   │  Overdue        │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every invoice has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `invoice_number`: business identifier ("INV-042") - human-readable,
//!   sequential per account

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// GST Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (the standard GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstRate(u32);

impl GstRate {
    /// Creates a GST rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        GstRate(bps)
    }

    /// Creates a GST rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        GstRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate (GST-exempt invoice).
    #[inline]
    pub const fn zero() -> Self {
        GstRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate::zero()
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// The lifecycle status of an invoice.
///
/// New invoices always start as `Pending`. Transitions to `Paid` or
/// `Overdue` are driven by payment reconciliation outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Payment received in full.
    Paid,
    /// Awaiting payment.
    Pending,
    /// Payment deadline has passed.
    Overdue,
}

impl InvoiceStatus {
    /// Whether the invoiced amount is still owed (pending or overdue).
    #[inline]
    pub const fn is_outstanding(&self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Overdue)
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

// =============================================================================
// Drafts (pre-save input)
// =============================================================================

/// One line of an invoice as entered by the user, before totals exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemDraft {
    /// What is being billed ("Web Development Services").
    pub description: String,
    /// Units billed. Whole units only.
    pub quantity: i64,
    /// Price per unit in paise.
    pub unit_price_paise: i64,
    /// Line discount in basis points (1000 = 10%). Defaults to no discount.
    #[serde(default)]
    pub discount_bps: u32,
}

impl LineItemDraft {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }
}

/// A complete invoice as entered by the user, before it is numbered,
/// totalled and persisted.
///
/// The draft never carries an id, number, status or totals. Those are
/// assigned by the creation workflow so that clients cannot forge them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// The date printed on the invoice (not the creation timestamp).
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,
    /// GST rate for the whole invoice. Defaults to zero-rated.
    #[serde(default)]
    pub gst_rate_bps: u32,
    /// Ordered line items. Must contain at least one line.
    pub items: Vec<LineItemDraft>,
}

impl InvoiceDraft {
    /// Returns the GST rate.
    #[inline]
    pub fn gst_rate(&self) -> GstRate {
        GstRate::from_bps(self.gst_rate_bps)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A persisted line item.
/// Line amounts are frozen at creation time so historical invoices never
/// change when pricing rules do.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    /// Zero-based position within the invoice (preserves entry order).
    pub position: i64,
    pub description: String,
    pub quantity: i64,
    /// Unit price in paise at creation time (frozen).
    pub unit_price_paise: i64,
    /// Line discount in basis points at creation time (frozen).
    pub discount_bps: u32,
    /// quantity × unit price, before discount (frozen).
    pub gross_paise: i64,
    /// Discount amount in paise (frozen).
    pub discount_paise: i64,
    /// gross − discount (frozen).
    pub net_paise: i64,
}

impl InvoiceItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Returns the line net as Money.
    #[inline]
    pub fn net(&self) -> Money {
        Money::from_paise(self.net_paise)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted invoice with cached totals.
///
/// Totals are computed once at creation and stored alongside the raw line
/// data. Items are immutable after creation, so the cache can never go
/// stale; reads never recompute.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Owning account. Every read and write is scoped to this.
    pub account_id: String,
    /// Sequential business identifier ("INV-042"), unique per account.
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// The date printed on the invoice.
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,
    pub status: InvoiceStatus,
    /// GST rate applied to the invoice net.
    pub gst_rate_bps: u32,
    /// Σ line gross (frozen).
    pub subtotal_paise: i64,
    /// Σ line discounts (frozen).
    pub discount_paise: i64,
    /// GST on (subtotal − discount) (frozen).
    pub gst_paise: i64,
    /// Grand total: net + GST (frozen).
    pub total_paise: i64,
    /// Ordered line items.
    pub items: Vec<InvoiceItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    /// Returns the GST amount as Money.
    #[inline]
    pub fn gst(&self) -> Money {
        Money::from_paise(self.gst_paise)
    }

    /// Returns the GST rate.
    #[inline]
    pub fn gst_rate(&self) -> GstRate {
        GstRate::from_bps(self.gst_rate_bps)
    }
}

// =============================================================================
// Account
// =============================================================================

/// A billing account. Each account owns an isolated invoice series.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Account {
    pub id: String,
    /// Login identifier, unique across the system.
    pub email: String,
    pub display_name: String,
    /// Argon2id PHC string. `"!"` marks a locked account that can never
    /// log in (used for the shared anonymous account).
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gst_rate_from_bps() {
        let rate = GstRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_gst_rate_from_percentage() {
        let rate = GstRate::from_percentage(12.5);
        assert_eq!(rate.bps(), 1250);
    }

    #[test]
    fn test_invoice_status_default() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Pending);
    }

    #[test]
    fn test_invoice_status_outstanding() {
        assert!(InvoiceStatus::Pending.is_outstanding());
        assert!(InvoiceStatus::Overdue.is_outstanding());
        assert!(!InvoiceStatus::Paid.is_outstanding());
    }

    #[test]
    fn test_line_item_draft_deserializes_without_discount() {
        let json = r#"{"description":"Hosting","quantity":1,"unit_price_paise":30000}"#;
        let item: LineItemDraft = serde_json::from_str(json).unwrap();
        assert_eq!(item.discount_bps, 0);
        assert_eq!(item.unit_price().paise(), 30000);
    }

    #[test]
    fn test_invoice_draft_deserializes_date() {
        let json = r#"{
            "customer_name": "Acme Inc.",
            "customer_email": "contact@acme.com",
            "customer_phone": "+1-202-555-0143",
            "invoice_date": "2024-06-01",
            "gst_rate_bps": 1800,
            "items": [{"description":"Web Development Services","quantity":1,"unit_price_paise":500000}]
        }"#;
        let draft: InvoiceDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.invoice_date.to_string(), "2024-06-01");
        assert_eq!(draft.gst_rate().bps(), 1800);
        assert_eq!(draft.items.len(), 1);
    }

    #[test]
    fn test_account_password_hash_not_serialized() {
        let account = Account {
            id: "a".into(),
            email: "user@example.com".into(),
            display_name: "User".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }
}
