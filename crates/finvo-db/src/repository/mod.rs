//! # Repository Module
//!
//! Database repository implementations for Finvo.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Request Handler / BillingService                                      │
//! │       │                                                                 │
//! │       │  db.invoices().list(account_id)                                │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── list(&self, account_id)                                           │
//! │  ├── get_by_id(&self, account_id, id)                                  │
//! │  ├── append(&self, invoice)                                            │
//! │  └── list_numbers(&self, account_id)                                   │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database)                                   │
//! │  • SQL is isolated in one place                                        │
//! │  • Every read and write is account-scoped                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`invoice::InvoiceRepository`] - Append-only invoice store
//! - [`account::AccountRepository`] - Accounts for login and ownership

pub mod account;
pub mod invoice;
