//! # Invoice Totals
//!
//! Pure computation of line and invoice totals.
//!
//! ## Order of Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Totals Pipeline (all integer paise)                  │
//! │                                                                         │
//! │  Per line:                                                              │
//! │    gross    = quantity × unit_price                                     │
//! │    discount = round_half_up(gross × discount_bps / 10000)               │
//! │    net      = gross − discount                                          │
//! │                                                                         │
//! │  Per invoice:                                                           │
//! │    subtotal = Σ line gross                                              │
//! │    discount = Σ line discounts      (rounded per line, then summed)     │
//! │    net      = subtotal − discount                                       │
//! │    gst      = round_half_up(net × gst_bps / 10000)                      │
//! │    cgst     = ⌊gst / 2⌋    sgst = gst − cgst    (sum back exactly)      │
//! │    total    = net + gst                                                 │
//! │                                                                         │
//! │  Same input ⇒ same output, on every machine, on every run.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Discounts round per line and are then summed; GST rounds once on the
//! invoice net. The two choices are independent and both are deliberate:
//! a line's printed discount must match what the customer was promised,
//! and GST is assessed on the invoice as a whole.
//!
//! ## Usage
//! ```rust
//! use finvo_core::totals::InvoiceTotals;
//! use finvo_core::types::{GstRate, LineItemDraft};
//!
//! let items = vec![
//!     LineItemDraft {
//!         description: "Web Development Services".into(),
//!         quantity: 1,
//!         unit_price_paise: 500000,
//!         discount_bps: 0,
//!     },
//!     LineItemDraft {
//!         description: "Hosting (1 year)".into(),
//!         quantity: 1,
//!         unit_price_paise: 30000,
//!         discount_bps: 1000,
//!     },
//! ];
//!
//! let totals = InvoiceTotals::compute(&items, GstRate::from_bps(1800)).unwrap();
//! assert_eq!(totals.total_paise, 621860); // ₹6218.60
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{GstRate, LineItemDraft};
use crate::validation::{validate_gst_rate_bps, validate_line_item, ValidationResult};
use crate::MAX_INVOICE_ITEMS;

// =============================================================================
// Line Totals
// =============================================================================

/// The three amounts of a single invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTotals {
    /// quantity × unit price, before discount.
    pub gross_paise: i64,
    /// Discount amount, rounded half up at the paise.
    pub discount_paise: i64,
    /// gross − discount.
    pub net_paise: i64,
}

impl LineTotals {
    /// Computes the totals for one line item.
    ///
    /// Validates the line first; a quantity of zero or a discount above
    /// 100% is rejected, never clamped.
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::totals::LineTotals;
    /// use finvo_core::types::LineItemDraft;
    ///
    /// let item = LineItemDraft {
    ///     description: "Hosting (1 year)".into(),
    ///     quantity: 1,
    ///     unit_price_paise: 30000,
    ///     discount_bps: 1000, // 10%
    /// };
    ///
    /// let line = LineTotals::compute(&item).unwrap();
    /// assert_eq!(line.gross_paise, 30000);
    /// assert_eq!(line.discount_paise, 3000);
    /// assert_eq!(line.net_paise, 27000);
    /// ```
    pub fn compute(item: &LineItemDraft) -> ValidationResult<LineTotals> {
        validate_line_item(item)?;

        let gross = item.unit_price().multiply_quantity(item.quantity);
        let discount = gross.percentage(item.discount_bps);
        let net = gross - discount;

        Ok(LineTotals {
            gross_paise: gross.paise(),
            discount_paise: discount.paise(),
            net_paise: net.paise(),
        })
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// The complete set of derived amounts for an invoice.
///
/// Produced once at creation time and cached on the stored invoice.
/// Recomputing from the same lines always reproduces these numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Σ line gross.
    pub subtotal_paise: i64,
    /// Σ line discounts.
    pub discount_paise: i64,
    /// subtotal − discount.
    pub net_paise: i64,
    /// GST on the net, rounded half up.
    pub gst_paise: i64,
    /// Central component: ⌊gst / 2⌋.
    pub cgst_paise: i64,
    /// State component: gst − cgst. cgst + sgst == gst always.
    pub sgst_paise: i64,
    /// Grand total: net + gst.
    pub total_paise: i64,
}

impl InvoiceTotals {
    /// Computes invoice totals from its line items and GST rate.
    ///
    /// ## Errors
    /// - `Required` if there are no line items
    /// - `OutOfRange` if there are more than 100 lines, or the rate
    ///   exceeds 100%
    /// - Any per-line validation failure, unchanged
    pub fn compute(items: &[LineItemDraft], rate: GstRate) -> ValidationResult<InvoiceTotals> {
        validate_gst_rate_bps(rate.bps())?;

        if items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            });
        }

        if items.len() > MAX_INVOICE_ITEMS {
            return Err(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_INVOICE_ITEMS as i64,
            });
        }

        let mut subtotal: i64 = 0;
        let mut discount: i64 = 0;

        for item in items {
            let line = LineTotals::compute(item)?;
            subtotal += line.gross_paise;
            discount += line.discount_paise;
        }

        let net = subtotal - discount;
        let gst = Money::from_paise(net).calculate_gst(rate);
        let (cgst, sgst) = gst.split_half();

        Ok(InvoiceTotals {
            subtotal_paise: subtotal,
            discount_paise: discount,
            net_paise: net,
            gst_paise: gst.paise(),
            cgst_paise: cgst.paise(),
            sgst_paise: sgst.paise(),
            total_paise: net + gst.paise(),
        })
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
