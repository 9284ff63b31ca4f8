//! # finvo-core: Pure Business Logic for Finvo
//!
//! This crate is the **heart** of Finvo. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Finvo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Client (TypeScript)                      │   │
//! │  │    Invoice Form ──► Invoice List ──► Dashboard ──► Insights    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    create_invoice, list_invoices, dashboard, insights, auth    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ finvo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ numbering │  │   │
//! │  │   │  Invoice  │  │   Money   │  │ LineTotals│  │ INV-xxx   │  │   │
//! │  │   │  Account  │  │  GstCalc  │  │ InvTotals │  │ sequence  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │ dashboard │  │ insights  │  │ validation│                 │   │
//! │  │   │ summaries │  │ analysis  │  │   rules   │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    finvo-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, InvoiceItem, Account, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Line and invoice totals computation
//! - [`numbering`] - Sequential invoice number derivation
//! - [`dashboard`] - Dashboard reductions (totals, monthly buckets)
//! - [`insights`] - Deterministic invoice analysis
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use finvo_core::totals::InvoiceTotals;
//! use finvo_core::types::{GstRate, LineItemDraft};
//!
//! let items = vec![LineItemDraft {
//!     description: "Web Development Services".into(),
//!     quantity: 1,
//!     unit_price_paise: 500000, // ₹5000.00, never from floats!
//!     discount_bps: 0,
//! }];
//!
//! // 18% GST on the net, rounded half up at the paise
//! let totals = InvoiceTotals::compute(&items, GstRate::from_bps(1800)).unwrap();
//! assert_eq!(totals.gst_paise, 90000);
//! assert_eq!(totals.total_paise, 590000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dashboard;
pub mod error;
pub mod insights;
pub mod money;
pub mod numbering;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use finvo_core::Money` instead of
// `use finvo_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use totals::{InvoiceTotals, LineTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Account ID that owns invoices created without logging in.
///
/// ## Why a constant?
/// The HTTP API accepts unauthenticated requests; their invoices all land
/// in this shared account so the storage model never needs a nullable
/// owner. The row itself is seeded by the initial migration with a locked
/// password hash.
pub const ANONYMOUS_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Maximum line items allowed on a single invoice
///
/// ## Business Reason
/// Prevents runaway invoices and keeps documents printable.
/// Can be made configurable per-account in future versions.
pub const MAX_INVOICE_ITEMS: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-billing (e.g., typing 10000 instead of 10).
/// Configurable per-account in future versions.
pub const MAX_ITEM_QUANTITY: i64 = 9999;
