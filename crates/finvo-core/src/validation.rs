//! # Validation Module
//!
//! Input validation for invoice drafts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation always rejects, never repairs: a draft with quantity 0 or a
//! discount above 100% comes back as an error, not silently clamped.
//!
//! ## Usage
//! ```rust
//! use finvo_core::validation::{validate_quantity, validate_discount_bps};
//!
//! validate_quantity(5).unwrap();
//! validate_discount_bps(1000).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{InvoiceDraft, LineItemDraft};
use crate::{MAX_INVOICE_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line item description.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use finvo_core::validation::validate_description;
///
/// assert!(validate_description("Web Development Services").is_ok());
/// assert!(validate_description("").is_err());
/// ```
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 2 and 120 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_name".to_string(),
        });
    }

    if name.len() < 2 {
        return Err(ValidationError::TooShort {
            field: "customer_name".to_string(),
            min: 2,
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates a customer email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain a local part and a domain separated by '@'
/// - Must not contain whitespace
/// - Must be at most 254 characters (RFC 5321 limit)
///
/// Deliberately permissive beyond that; deliverability is not our problem.
pub fn validate_customer_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "customer_email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "customer_email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates a customer phone number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - May contain digits, spaces, and + - ( )
pub fn validate_customer_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_phone".to_string(),
        });
    }

    if phone.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "customer_phone".to_string(),
            max: 20,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "customer_phone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (9999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free line items)
///
/// ## Example
/// ```rust
/// use finvo_core::validation::validate_unit_price_paise;
///
/// assert!(validate_unit_price_paise(500000).is_ok()); // ₹5000.00
/// assert!(validate_unit_price_paise(0).is_ok());      // Free item
/// assert!(validate_unit_price_paise(-100).is_err());  // Invalid
/// ```
pub fn validate_unit_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a line discount in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - 100% is allowed (fully comped line)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a GST rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Real slabs are 0-2800 (0% to 28%)
pub fn validate_gst_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "gst_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Draft Validators
// =============================================================================

/// Validates a single line item draft.
pub fn validate_line_item(item: &LineItemDraft) -> ValidationResult<()> {
    validate_description(&item.description)?;
    validate_quantity(item.quantity)?;
    validate_unit_price_paise(item.unit_price_paise)?;
    validate_discount_bps(item.discount_bps)?;
    Ok(())
}

/// Validates a complete invoice draft.
///
/// This is the single gate in front of the totals calculator and the
/// store: if this returns Ok, every downstream computation may assume
/// well-formed input.
///
/// ## Rules
/// - Customer name, email and phone must pass their field validators
/// - GST rate must be at most 100%
/// - At least one line item, at most MAX_INVOICE_ITEMS (100)
/// - Every line item must pass [`validate_line_item`]
pub fn validate_draft(draft: &InvoiceDraft) -> ValidationResult<()> {
    validate_customer_name(&draft.customer_name)?;
    validate_customer_email(&draft.customer_email)?;
    validate_customer_phone(&draft.customer_phone)?;
    validate_gst_rate_bps(draft.gst_rate_bps)?;

    if draft.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if draft.items.len() > MAX_INVOICE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_INVOICE_ITEMS as i64,
        });
    }

    for item in &draft.items {
        validate_line_item(item)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft() -> InvoiceDraft {
        InvoiceDraft {
            customer_name: "Acme Inc.".to_string(),
            customer_email: "contact@acme.com".to_string(),
            customer_phone: "+1-202-555-0143".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            gst_rate_bps: 1800,
            items: vec![LineItemDraft {
                description: "Web Development Services".to_string(),
                quantity: 1,
                unit_price_paise: 500000,
                discount_bps: 0,
            }],
        }
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Hosting (1 year)").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description("   ").is_err());
        assert!(validate_description(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Acme Inc.").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("A").is_err());
        assert!(validate_customer_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_customer_email() {
        assert!(validate_customer_email("contact@acme.com").is_ok());
        assert!(validate_customer_email("tony@stark.com").is_ok());
        assert!(validate_customer_email("").is_err());
        assert!(validate_customer_email("no-at-sign").is_err());
        assert!(validate_customer_email("@missing-local.com").is_err());
        assert!(validate_customer_email("missing-domain@").is_err());
        assert!(validate_customer_email("has space@acme.com").is_err());
    }

    #[test]
    fn test_validate_customer_phone() {
        assert!(validate_customer_phone("+1-202-555-0143").is_ok());
        assert!(validate_customer_phone("(022) 4050 6070").is_ok());
        assert!(validate_customer_phone("").is_err());
        assert!(validate_customer_phone("call me maybe").is_err());
        assert!(validate_customer_phone(&"9".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(9999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(10000).is_err());
    }

    #[test]
    fn test_validate_unit_price_paise() {
        assert!(validate_unit_price_paise(0).is_ok());
        assert!(validate_unit_price_paise(500000).is_ok());
        assert!(validate_unit_price_paise(-100).is_err());
    }

    #[test]
    fn test_validate_discount_bps() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(1000).is_ok());
        assert!(validate_discount_bps(10000).is_ok());
        assert!(validate_discount_bps(10001).is_err());
    }

    #[test]
    fn test_validate_gst_rate_bps() {
        assert!(validate_gst_rate_bps(0).is_ok());
        assert!(validate_gst_rate_bps(1800).is_ok());
        assert!(validate_gst_rate_bps(10000).is_ok());
        assert!(validate_gst_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_draft_accepts_good_input() {
        assert!(validate_draft(&draft()).is_ok());
    }

    #[test]
    fn test_validate_draft_rejects_empty_items() {
        let mut d = draft();
        d.items.clear();
        let err = validate_draft(&d).unwrap_err();
        assert_eq!(err.to_string(), "items is required");
    }

    #[test]
    fn test_validate_draft_rejects_too_many_items() {
        let mut d = draft();
        let item = d.items[0].clone();
        d.items = vec![item; MAX_INVOICE_ITEMS + 1];
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn test_validate_draft_rejects_bad_line() {
        let mut d = draft();
        d.items[0].quantity = 0;
        assert!(validate_draft(&d).is_err());

        let mut d = draft();
        d.items[0].discount_bps = 12000;
        assert!(validate_draft(&d).is_err());
    }
}
