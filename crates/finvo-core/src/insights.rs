//! # Invoice Insights
//!
//! Deterministic analysis of an account's invoices.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Insights Pipeline                                 │
//! │                                                                         │
//! │  invoices ──► invoice_digest() ──► CSV digest (stable, compact)        │
//! │                     │                                                   │
//! │                     ├──► render_prompt() ──► analyst prompt text        │
//! │                     │         (for callers that bring their own LLM)    │
//! │                     │                                                   │
//! │  invoices ──► analyze_invoices() ──► InvoiceInsights                    │
//! │                     (built-in heuristics, no network, no model)         │
//! │                                                                         │
//! │  Same invoices ⇒ same digest, same prompt, same insights.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The three insight sections mirror what a billing analyst reports:
//! sales trends, customer behavior, and revenue opportunities.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dashboard::summarize;
use crate::money::Money;
use crate::types::{Invoice, InvoiceStatus};

// =============================================================================
// Output Type
// =============================================================================

/// The three-section analyst report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceInsights {
    /// Notable patterns in billing volume over time.
    pub sales_trends: String,
    /// Who is being billed, and how the billing distributes.
    pub customer_behavior: String,
    /// Where more revenue could plausibly come from.
    pub revenue_opportunities: String,
}

// =============================================================================
// Digest
// =============================================================================

/// Renders invoices as a compact CSV digest, one row per invoice.
///
/// The digest carries only header-level data (no line items) so it stays
/// small no matter how detailed the invoices are. Rows appear in input
/// order; same input, same bytes.
///
/// ## Example
/// ```rust,no_run
/// use finvo_core::insights::invoice_digest;
///
/// # let invoices = Vec::new();
/// let digest = invoice_digest(&invoices);
/// assert!(digest.starts_with("invoice_number,customer_name,invoice_date,status,total"));
/// ```
pub fn invoice_digest(invoices: &[Invoice]) -> String {
    let mut out = String::from("invoice_number,customer_name,invoice_date,status,total\n");

    for invoice in invoices {
        let status = match invoice.status {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Overdue => "overdue",
        };
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(&invoice.invoice_number),
            csv_field(&invoice.customer_name),
            invoice.invoice_date,
            status,
            invoice.total(),
        ));
    }

    out
}

/// Quotes a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Prompt
// =============================================================================

/// The analyst prompt with the digest substituted in.
///
/// Callers that want model-written prose instead of the built-in
/// heuristics can send this to a provider of their choice; the expected
/// response shape is [`InvoiceInsights`].
pub fn render_prompt(digest: &str) -> String {
    format!(
        "You are an expert business analyst specializing in invoice data analysis.\n\
         \n\
         You will analyze the provided invoice data to identify sales trends, customer behavior, and potential revenue opportunities.\n\
         \n\
         Invoice Data: {digest}\n\
         \n\
         Based on this data, identify:\n\
         \n\
         *   Sales Trends: Describe any notable patterns or trends in sales.\n\
         *   Customer Behavior: Analyze customer purchasing habits and preferences.\n\
         *   Revenue Opportunities: Suggest potential areas for revenue growth.\n"
    )
}

// =============================================================================
// Heuristic Analysis
// =============================================================================

/// Produces the three-section report from the invoices themselves.
///
/// Pure arithmetic over cached totals; re-running on the same invoices
/// always yields the identical report.
pub fn analyze_invoices(invoices: &[Invoice]) -> InvoiceInsights {
    if invoices.is_empty() {
        return InvoiceInsights {
            sales_trends: "No invoices recorded yet, so there are no sales trends to report."
                .to_string(),
            customer_behavior: "No customers have been billed yet.".to_string(),
            revenue_opportunities:
                "Start by issuing your first invoice; analysis will pick up from there."
                    .to_string(),
        };
    }

    let summary = summarize(invoices);

    InvoiceInsights {
        sales_trends: sales_trends(&summary),
        customer_behavior: customer_behavior(invoices, summary.total_sales_paise),
        revenue_opportunities: revenue_opportunities(invoices, &summary),
    }
}

fn sales_trends(summary: &crate::dashboard::DashboardSummary) -> String {
    let (prev, last) = match summary.monthly_sales.as_slice() {
        [] => {
            return "No billing activity yet.".to_string();
        }
        [only] => {
            return format!(
                "All billing so far falls in {}, totalling {}.",
                only.month,
                Money::from_paise(only.total_paise)
            );
        }
        [.., prev, last] => (prev, last),
    };

    let mut best = last;
    for month in &summary.monthly_sales {
        if month.total_paise > best.total_paise {
            best = month;
        }
    }

    let direction = if last.total_paise > prev.total_paise {
        format!(
            "Sales rose from {} in {} to {} in {}.",
            Money::from_paise(prev.total_paise),
            prev.month,
            Money::from_paise(last.total_paise),
            last.month
        )
    } else if last.total_paise < prev.total_paise {
        format!(
            "Sales fell from {} in {} to {} in {}.",
            Money::from_paise(prev.total_paise),
            prev.month,
            Money::from_paise(last.total_paise),
            last.month
        )
    } else {
        format!(
            "Sales held steady at {} across {} and {}.",
            Money::from_paise(last.total_paise),
            prev.month,
            last.month
        )
    };

    format!(
        "{} The strongest month was {} at {}, out of {} months with billing activity.",
        direction,
        best.month,
        Money::from_paise(best.total_paise),
        summary.monthly_sales.len()
    )
}

fn customer_behavior(invoices: &[Invoice], total_sales_paise: i64) -> String {
    // Revenue per customer, first-seen order for deterministic tie-breaks
    let mut customers: Vec<(String, i64)> = Vec::new();
    for invoice in invoices {
        match customers
            .iter_mut()
            .find(|(name, _)| name == &invoice.customer_name)
        {
            Some((_, total)) => *total += invoice.total_paise,
            None => customers.push((invoice.customer_name.clone(), invoice.total_paise)),
        }
    }

    let mut top_name = "";
    let mut top_total = i64::MIN;
    for (name, total) in &customers {
        if *total > top_total {
            top_name = name;
            top_total = *total;
        }
    }

    let average = total_sales_paise / invoices.len() as i64;

    format!(
        "{} invoices span {} customers. {} is the largest account at {}{}. The average invoice is worth {}.",
        invoices.len(),
        customers.len(),
        top_name,
        Money::from_paise(top_total),
        share_clause(top_total, total_sales_paise),
        Money::from_paise(average)
    )
}

fn revenue_opportunities(
    invoices: &[Invoice],
    summary: &crate::dashboard::DashboardSummary,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let overdue: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Overdue)
        .collect();
    if !overdue.is_empty() {
        let owed: i64 = overdue.iter().map(|i| i.total_paise).sum();
        parts.push(format!(
            "Collecting the {} overdue invoice{} would release {} immediately.",
            overdue.len(),
            if overdue.len() == 1 { "" } else { "s" },
            Money::from_paise(owed)
        ));
    }

    let pending: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Pending)
        .collect();
    if !pending.is_empty() {
        let due: i64 = pending.iter().map(|i| i.total_paise).sum();
        parts.push(format!(
            "Another {} pending invoice{} worth {} should be followed up before they slip overdue.",
            pending.len(),
            if pending.len() == 1 { "" } else { "s" },
            Money::from_paise(due)
        ));
    }

    let gross: i64 = invoices.iter().map(|i| i.subtotal_paise).sum();
    let given_away: i64 = invoices.iter().map(|i| i.discount_paise).sum();
    if given_away > 0 {
        parts.push(format!(
            "Discounts gave away {}{}; reviewing them is the quickest margin win.",
            Money::from_paise(given_away),
            share_clause(given_away, gross)
        ));
    }

    if parts.is_empty() {
        if let Some(best) = summary.monthly_sales.iter().max_by_key(|m| m.total_paise) {
            parts.push(format!(
                "Everything billed has been collected at full price; growth must come from new billing, such as repeating the {} peak of {}.",
                best.month,
                Money::from_paise(best.total_paise)
            ));
        }
    }

    parts.join(" ")
}

/// " (42% of billing)" or empty when the base is zero.
fn share_clause(part: i64, whole: i64) -> String {
    if whole <= 0 {
        return String::new();
    }
    let percent = (part as i128 * 100 + whole as i128 / 2) / whole as i128;
    format!(" ({}% of billing)", percent)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn invoice(
        number: &str,
        customer: &str,
        date: &str,
        status: InvoiceStatus,
        subtotal: i64,
        discount: i64,
        total: i64,
    ) -> Invoice {
        Invoice {
            id: format!("id-{number}"),
            account_id: "acct".to_string(),
            invoice_number: number.to_string(),
            customer_name: customer.to_string(),
            customer_email: "billing@example.com".to_string(),
            customer_phone: "+91 98765 43210".to_string(),
            invoice_date: date.parse::<NaiveDate>().unwrap(),
            status,
            gst_rate_bps: 1800,
            subtotal_paise: subtotal,
            discount_paise: discount,
            gst_paise: 0,
            total_paise: total,
            items: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_digest_header_and_rows() {
        let invoices = vec![
            invoice("INV-001", "Acme Inc.", "2024-06-01", InvoiceStatus::Paid, 100, 0, 100),
            invoice("INV-002", "Stark Industries", "2024-05-15", InvoiceStatus::Pending, 200, 0, 200),
        ];
        let digest = invoice_digest(&invoices);
        let lines: Vec<&str> = digest.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "invoice_number,customer_name,invoice_date,status,total");
        assert_eq!(lines[1], "INV-001,Acme Inc.,2024-06-01,paid,₹1.00");
        assert_eq!(lines[2], "INV-002,Stark Industries,2024-05-15,pending,₹2.00");
    }

    #[test]
    fn test_digest_quotes_awkward_names() {
        let invoices = vec![invoice(
            "INV-001",
            "Wayne, Kane \"&\" Sons",
            "2024-06-01",
            InvoiceStatus::Paid,
            100,
            0,
            100,
        )];
        let digest = invoice_digest(&invoices);
        assert!(digest.contains("\"Wayne, Kane \"\"&\"\" Sons\""));
    }

    #[test]
    fn test_digest_deterministic() {
        let invoices = vec![invoice(
            "INV-001",
            "Acme Inc.",
            "2024-06-01",
            InvoiceStatus::Paid,
            100,
            0,
            100,
        )];
        assert_eq!(invoice_digest(&invoices), invoice_digest(&invoices));
    }

    #[test]
    fn test_render_prompt_embeds_digest() {
        let digest = "invoice_number,customer_name,invoice_date,status,total\n";
        let prompt = render_prompt(digest);
        assert!(prompt.starts_with("You are an expert business analyst"));
        assert!(prompt.contains(digest));
        assert!(prompt.contains("*   Sales Trends:"));
        assert!(prompt.contains("*   Customer Behavior:"));
        assert!(prompt.contains("*   Revenue Opportunities:"));
    }

    #[test]
    fn test_analyze_empty() {
        let insights = analyze_invoices(&[]);
        assert!(insights.sales_trends.contains("No invoices"));
        assert!(insights.customer_behavior.contains("No customers"));
        assert!(insights.revenue_opportunities.contains("first invoice"));
    }

    #[test]
    fn test_analyze_reports_trend_and_top_customer() {
        let invoices = vec![
            invoice("INV-001", "Acme Inc.", "2024-05-01", InvoiceStatus::Paid, 100000, 0, 100000),
            invoice("INV-002", "Acme Inc.", "2024-06-01", InvoiceStatus::Paid, 300000, 0, 300000),
            invoice("INV-003", "Initech", "2024-06-15", InvoiceStatus::Pending, 50000, 0, 50000),
        ];
        let insights = analyze_invoices(&invoices);

        assert!(insights.sales_trends.contains("Sales rose"));
        assert!(insights.sales_trends.contains("2024-06"));
        assert!(insights.customer_behavior.contains("Acme Inc."));
        assert!(insights.customer_behavior.contains("2 customers"));
        assert!(insights.revenue_opportunities.contains("pending"));
    }

    #[test]
    fn test_analyze_flags_overdue_and_discounts() {
        let invoices = vec![
            invoice("INV-001", "Oscorp", "2024-06-10", InvoiceStatus::Overdue, 100000, 10000, 90000),
            invoice("INV-002", "Oscorp", "2024-06-20", InvoiceStatus::Overdue, 50000, 0, 50000),
        ];
        let insights = analyze_invoices(&invoices);

        assert!(insights
            .revenue_opportunities
            .contains("2 overdue invoices"));
        assert!(insights.revenue_opportunities.contains("₹1400.00"));
        assert!(insights.revenue_opportunities.contains("Discounts gave away ₹100.00"));
    }

    #[test]
    fn test_analyze_all_settled_suggests_growth() {
        let invoices = vec![invoice(
            "INV-001",
            "Globex Corporation",
            "2024-03-12",
            InvoiceStatus::Paid,
            800000,
            0,
            800000,
        )];
        let insights = analyze_invoices(&invoices);
        assert!(insights.revenue_opportunities.contains("2024-03"));
        assert!(insights.sales_trends.contains("All billing so far"));
    }

    #[test]
    fn test_analyze_deterministic() {
        let invoices = vec![
            invoice("INV-001", "Acme Inc.", "2024-05-01", InvoiceStatus::Paid, 100000, 0, 100000),
            invoice("INV-002", "Initech", "2024-06-01", InvoiceStatus::Overdue, 50000, 5000, 45000),
        ];
        assert_eq!(analyze_invoices(&invoices), analyze_invoices(&invoices));
    }
}
