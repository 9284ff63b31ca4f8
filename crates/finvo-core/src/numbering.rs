//! # Invoice Numbering
//!
//! Derives the next sequential invoice number for an account.
//!
//! ## How the Sequence Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Numbering ("INV-" + sequence)                         │
//! │                                                                         │
//! │  Existing numbers          Parsed        Next                           │
//! │  ────────────────          ──────        ────                           │
//! │  (none)                    -             INV-001                        │
//! │  INV-001, INV-002          1, 2          INV-003                        │
//! │  INV-001, INV-003          1, 3          INV-004   (gaps stay gaps)     │
//! │  INV-001, LEGACY-7         1, skip       INV-002   (malformed skipped)  │
//! │  INV-999                   999           INV-1000  (width grows)        │
//! │                                                                         │
//! │  The sequence is per account; two accounts both start at INV-001.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is pure: it looks at a list of existing numbers and says
//! what the next one is. Making that answer safe under concurrency is the
//! creation workflow's job (per-account lock plus a UNIQUE constraint).

/// The business-identifier prefix every generated number carries.
pub const INVOICE_NUMBER_PREFIX: &str = "INV-";

// =============================================================================
// Parsing
// =============================================================================

/// Parses a stored invoice number into its sequence value.
///
/// Accepts exactly `INV-<digits>`. Anything else (wrong prefix, empty
/// digits, stray characters, numbers too large for u64) is malformed and
/// returns None. Leading zeros are fine: "INV-007" parses to 7.
///
/// ## Example
/// ```rust
/// use finvo_core::numbering::parse_invoice_number;
///
/// assert_eq!(parse_invoice_number("INV-042"), Some(42));
/// assert_eq!(parse_invoice_number("INV-1000"), Some(1000));
/// assert_eq!(parse_invoice_number("LEGACY-7"), None);
/// assert_eq!(parse_invoice_number("INV-"), None);
/// assert_eq!(parse_invoice_number("INV-12a"), None);
/// ```
pub fn parse_invoice_number(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix(INVOICE_NUMBER_PREFIX)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<u64>().ok()
}

/// Formats a sequence value as an invoice number.
///
/// Pads to three digits; wider sequences keep all their digits.
///
/// ## Example
/// ```rust
/// use finvo_core::numbering::format_invoice_number;
///
/// assert_eq!(format_invoice_number(1), "INV-001");
/// assert_eq!(format_invoice_number(42), "INV-042");
/// assert_eq!(format_invoice_number(1000), "INV-1000");
/// ```
pub fn format_invoice_number(sequence: u64) -> String {
    format!("{}{:03}", INVOICE_NUMBER_PREFIX, sequence)
}

// =============================================================================
// Next Number
// =============================================================================

/// The outcome of a numbering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextInvoiceNumber {
    /// The formatted number to assign ("INV-003").
    pub number: String,
    /// Its numeric sequence value.
    pub sequence: u64,
    /// Stored numbers that did not parse and were ignored, in input
    /// order. The caller decides whether to log them.
    pub skipped: Vec<String>,
}

/// Computes the next invoice number from the account's existing numbers.
///
/// The next sequence is max(parsed) + 1, or 1 for an empty account.
/// Gaps are never reused; malformed numbers are skipped and reported,
/// never a reason to fail.
///
/// ## Example
/// ```rust
/// use finvo_core::numbering::next_invoice_number;
///
/// let next = next_invoice_number(["INV-001", "INV-003"]);
/// assert_eq!(next.number, "INV-004");
/// assert!(next.skipped.is_empty());
/// ```
pub fn next_invoice_number<I, S>(existing: I) -> NextInvoiceNumber
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut max_seen: u64 = 0;
    let mut skipped = Vec::new();

    for raw in existing {
        let raw = raw.as_ref();
        match parse_invoice_number(raw) {
            Some(seq) => max_seen = max_seen.max(seq),
            None => skipped.push(raw.to_string()),
        }
    }

    let sequence = max_seen.saturating_add(1);

    NextInvoiceNumber {
        number: format_invoice_number(sequence),
        sequence,
        skipped,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
