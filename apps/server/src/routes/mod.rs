//! HTTP route modules.
//!
//! Each module exposes a `router()` assembling its paths; [`crate::app`]
//! nests them under `/api/v1` (health stays at the root).

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod insights;
pub mod invoices;
