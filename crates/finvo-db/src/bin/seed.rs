//! # Seed Data Generator
//!
//! Populates the database with the demo invoice set for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p finvo-db --bin seed
//!
//! # Specify database path
//! cargo run -p finvo-db --bin seed -- --db ./data/finvo.db
//! ```
//!
//! ## Generated Invoices
//! Seven demo invoices (INV-001 .. INV-007) for the anonymous account,
//! spanning four months, all three statuses, GST rates from 0% to 28%,
//! and both discounted and undiscounted lines.
//!
//! Totals are recomputed from the line items at seed time, so the cached
//! columns always satisfy `total = grand total at creation` even where
//! the historical dataset carried stale numbers.

use chrono::{NaiveDate, Utc};
use std::env;
use uuid::Uuid;

use finvo_core::{
    GstRate, Invoice, InvoiceItem, InvoiceStatus, InvoiceTotals, LineItemDraft, LineTotals,
    ANONYMOUS_ACCOUNT_ID,
};
use finvo_db::{Database, DbConfig};

/// One line of a demo invoice.
struct DemoLine {
    description: &'static str,
    quantity: i64,
    unit_price_paise: i64,
    discount_bps: u32,
}

/// One demo invoice, totals deliberately absent (always recomputed).
struct DemoInvoice {
    number: &'static str,
    customer_name: &'static str,
    customer_email: &'static str,
    customer_phone: &'static str,
    invoice_date: &'static str,
    status: InvoiceStatus,
    gst_rate_bps: u32,
    lines: &'static [DemoLine],
}

const DEMO_INVOICES: &[DemoInvoice] = &[
    DemoInvoice {
        number: "INV-001",
        customer_name: "Acme Inc.",
        customer_email: "contact@acme.com",
        customer_phone: "+1-202-555-0143",
        invoice_date: "2024-06-01",
        status: InvoiceStatus::Paid,
        gst_rate_bps: 1800,
        lines: &[
            DemoLine {
                description: "Web Development Services",
                quantity: 1,
                unit_price_paise: 500000,
                discount_bps: 0,
            },
            DemoLine {
                description: "Hosting (1 year)",
                quantity: 1,
                unit_price_paise: 30000,
                discount_bps: 1000,
            },
        ],
    },
    DemoInvoice {
        number: "INV-002",
        customer_name: "Stark Industries",
        customer_email: "tony@stark.com",
        customer_phone: "+1-202-555-0185",
        invoice_date: "2024-05-15",
        status: InvoiceStatus::Pending,
        gst_rate_bps: 1800,
        lines: &[DemoLine {
            description: "Mark 42 Armor Repair",
            quantity: 1,
            unit_price_paise: 10000000,
            discount_bps: 1000,
        }],
    },
    DemoInvoice {
        number: "INV-003",
        customer_name: "Wayne Enterprises",
        customer_email: "bruce@wayne.com",
        customer_phone: "+1-202-555-0161",
        invoice_date: "2024-04-01",
        status: InvoiceStatus::Overdue,
        gst_rate_bps: 1200,
        lines: &[
            DemoLine {
                description: "Grappling Hook",
                quantity: 5,
                unit_price_paise: 100000,
                discount_bps: 0,
            },
            DemoLine {
                description: "Batarangs (Pack of 10)",
                quantity: 10,
                unit_price_paise: 50000,
                discount_bps: 0,
            },
        ],
    },
    DemoInvoice {
        number: "INV-004",
        customer_name: "Cyberdyne Systems",
        customer_email: "info@cyberdyne.com",
        customer_phone: "+1-202-555-0158",
        invoice_date: "2024-05-20",
        status: InvoiceStatus::Paid,
        gst_rate_bps: 1800,
        lines: &[DemoLine {
            description: "Neural Net Processor",
            quantity: 1,
            unit_price_paise: 7500000,
            discount_bps: 500,
        }],
    },
    DemoInvoice {
        number: "INV-005",
        customer_name: "Oscorp",
        customer_email: "norman@oscorp.com",
        customer_phone: "+1-202-555-0169",
        invoice_date: "2024-06-10",
        status: InvoiceStatus::Pending,
        gst_rate_bps: 2800,
        lines: &[DemoLine {
            description: "Performance Enhancers",
            quantity: 100,
            unit_price_paise: 25000,
            discount_bps: 0,
        }],
    },
    DemoInvoice {
        number: "INV-006",
        customer_name: "Globex Corporation",
        customer_email: "hank@globex.com",
        customer_phone: "+1-202-555-0132",
        invoice_date: "2024-03-12",
        status: InvoiceStatus::Paid,
        gst_rate_bps: 0,
        lines: &[DemoLine {
            description: "Consulting Services",
            quantity: 40,
            unit_price_paise: 20000,
            discount_bps: 0,
        }],
    },
    DemoInvoice {
        number: "INV-007",
        customer_name: "Initech",
        customer_email: "bill@initech.com",
        customer_phone: "+1-202-555-0188",
        invoice_date: "2024-02-28",
        status: InvoiceStatus::Overdue,
        gst_rate_bps: 500,
        lines: &[DemoLine {
            description: "TPS Reports Cover Sheets",
            quantity: 500,
            unit_price_paise: 250,
            discount_bps: 1000,
        }],
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./finvo_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Finvo Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./finvo_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Finvo Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Invoices: {}", DEMO_INVOICES.len());
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing invoices
    let existing = db.invoices().count(ANONYMOUS_ACCOUNT_ID).await?;
    if existing > 0 {
        println!("⚠ Demo account already has {} invoices", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Seed invoices
    println!();
    println!("Seeding invoices...");

    for demo in DEMO_INVOICES {
        let invoice = build_invoice(demo)?;
        db.invoices().append(&invoice).await?;
        println!(
            "  ✓ {} {:24} {}",
            invoice.invoice_number,
            invoice.customer_name,
            invoice.total()
        );
    }

    println!();
    println!("✓ Seed complete: {} invoices", DEMO_INVOICES.len());

    Ok(())
}

/// Builds a persistable invoice from a demo entry, running the same
/// totals math the creation workflow uses.
fn build_invoice(demo: &DemoInvoice) -> Result<Invoice, Box<dyn std::error::Error>> {
    let drafts: Vec<LineItemDraft> = demo
        .lines
        .iter()
        .map(|line| LineItemDraft {
            description: line.description.to_string(),
            quantity: line.quantity,
            unit_price_paise: line.unit_price_paise,
            discount_bps: line.discount_bps,
        })
        .collect();

    let totals = InvoiceTotals::compute(&drafts, GstRate::from_bps(demo.gst_rate_bps))?;

    let invoice_id = Uuid::new_v4().to_string();
    let invoice_date = NaiveDate::parse_from_str(demo.invoice_date, "%Y-%m-%d")?;
    let now = Utc::now();

    let mut items = Vec::with_capacity(drafts.len());
    for (position, draft) in drafts.iter().enumerate() {
        let line = LineTotals::compute(draft)?;
        items.push(InvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.clone(),
            position: position as i64,
            description: draft.description.clone(),
            quantity: draft.quantity,
            unit_price_paise: draft.unit_price_paise,
            discount_bps: draft.discount_bps,
            gross_paise: line.gross_paise,
            discount_paise: line.discount_paise,
            net_paise: line.net_paise,
        });
    }

    Ok(Invoice {
        id: invoice_id,
        account_id: ANONYMOUS_ACCOUNT_ID.to_string(),
        invoice_number: demo.number.to_string(),
        customer_name: demo.customer_name.to_string(),
        customer_email: demo.customer_email.to_string(),
        customer_phone: demo.customer_phone.to_string(),
        invoice_date,
        status: demo.status,
        gst_rate_bps: demo.gst_rate_bps,
        subtotal_paise: totals.subtotal_paise,
        discount_paise: totals.discount_paise,
        gst_paise: totals.gst_paise,
        total_paise: totals.total_paise,
        items,
        created_at: now,
        updated_at: now,
    })
}
