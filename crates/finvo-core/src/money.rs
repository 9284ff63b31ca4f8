//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many invoicing systems:                                             │
//! │    ₹5270.00 × 18% = ₹948.6000000000001  → Which paise do we bill?      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    527000 paise × 1800 bps / 10000 = 94860 paise, exactly              │
//! │    Rounding happens once, explicitly, and is the same on every run     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use finvo_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(530000); // ₹5300.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;            // ₹10600.00
//! let total = price + Money::from_paise(500); // ₹5305.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(5300.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::GstRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for credit notes, corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► line gross ──► line discount ──► line net     │
/// │                                                                         │
/// │  Σ line gross = subtotal    Σ line discount = invoice discount         │
/// │                                                                         │
/// │  net ──► GST (CGST + SGST) ──► grand total ──► stored on the invoice   │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // Represents ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    ///
    /// ## Why Paise?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and API all use paise.
    /// Only the UI converts to rupees for display.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from major and minor units (rupees and paise).
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::money::Money;
    ///
    /// let price = Money::from_rupees(10, 99); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    ///
    /// let credit = Money::from_rupees(-5, 50); // -₹5.50 (credit note)
    /// assert_eq!(credit.paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_rupees(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees(major: i64, minor: i64) -> Self {
        // Handle sign: if major is negative, minor should subtract
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::money::Money;
    ///
    /// let price = Money::from_paise(1099);
    /// assert_eq!(price.rupees(), 10);
    ///
    /// let negative = Money::from_paise(-550);
    /// assert_eq!(negative.rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (paise) portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates GST on this amount, rounding half up.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP, ONCE, AT THE PAISE                                  │
    /// │                                                                     │
    /// │  GST rarely lands on a whole paise:                                 │
    /// │    ₹52.70 × 18% = ₹9.486 → 948.6 paise                             │
    /// │                                                                     │
    /// │  We round the fractional paise half-up exactly once:                │
    /// │    948.6 → 949    948.5 → 949    948.4 → 948                        │
    /// │                                                                     │
    /// │  Integer math makes the result identical on every machine;         │
    /// │  re-running the calculation can never drift by a paise.            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// We use integer math: `(amount * rate + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::money::Money;
    /// use finvo_core::types::GstRate;
    ///
    /// let net = Money::from_paise(527000); // ₹5270.00
    /// let rate = GstRate::from_bps(1800);  // 18%
    ///
    /// let gst = net.calculate_gst(rate);
    /// // ₹5270.00 × 18% = ₹948.60 exactly
    /// assert_eq!(gst.paise(), 94860);
    /// ```
    pub fn calculate_gst(&self, rate: GstRate) -> Money {
        // Use i128 to prevent overflow on large amounts
        // rate.bps() is basis points: 1800 = 18%
        // Formula: amount_paise * bps / 10000
        // With rounding: (amount_paise * bps + 5000) / 10000
        let gst_paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(gst_paise as i64)
    }

    /// Calculates a percentage portion of this amount, rounding half up.
    ///
    /// Used for line-item discounts: the caller keeps both the portion
    /// (the discount amount) and the remainder (the net).
    ///
    /// ## Arguments
    /// * `bps` - Percentage in basis points (1000 = 10%)
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::money::Money;
    ///
    /// let gross = Money::from_paise(30000); // ₹300.00
    /// let discount = gross.percentage(1000); // 10%
    /// assert_eq!(discount.paise(), 3000);    // ₹30.00
    /// assert_eq!((gross - discount).paise(), 27000);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let portion = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_paise(portion as i64)
    }

    /// Splits this amount into two halves that sum back exactly.
    ///
    /// GST is billed as two equal components (CGST + SGST). An odd paise
    /// cannot be halved evenly, so the first half takes the floor and the
    /// second half takes the remainder.
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::money::Money;
    ///
    /// let even = Money::from_paise(94860);
    /// assert_eq!(even.split_half(), (Money::from_paise(47430), Money::from_paise(47430)));
    ///
    /// let odd = Money::from_paise(101);
    /// let (first, second) = odd.split_half();
    /// assert_eq!(first.paise(), 50);
    /// assert_eq!(second.paise(), 51);
    /// assert_eq!(first + second, odd);
    /// ```
    #[inline]
    pub const fn split_half(&self) -> (Money, Money) {
        let first = self.0 / 2;
        (Money(first), Money(self.0 - first))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use finvo_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(250); // ₹2.50
    /// let line_gross = unit_price.multiply_quantity(500);
    /// assert_eq!(line_gross.paise(), 125000); // ₹1250.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs, reports and generated insight text. Use frontend
/// formatting for actual UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
