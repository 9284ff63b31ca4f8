//! Service layer: the workflows between HTTP handlers and storage.
//!
//! Handlers stay thin; everything that touches more than one repository
//! call, or mixes computation with persistence, lives here.

pub mod auth;
pub mod billing;
