//! Domain repositories.
//!
//! - [`prescriptions`] — the prescription store gateway (CRUD + enrichment)
//! - [`medications`] — the medication reference lookup

pub mod medications;
pub mod prescriptions;
