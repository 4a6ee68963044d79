//! # Clinica Core
//!
//! Core business logic for the Clinica prescription record service.
//!
//! This crate contains pure data operations:
//! - Prescription CRUD against a JSON document store on the file system
//! - Medication reference lookup over a flat semicolon-delimited dataset
//!
//! **No API concerns**: HTTP servers, routing, or response shaping belong in
//! `api-rest`.

pub mod config;
pub mod error;
pub mod prescription;
pub mod repositories;
pub mod store;

pub use config::CoreConfig;
pub use error::{ClinicError, ClinicResult};
pub use prescription::{
    CreatePrescriptionReq, MedicationEntry, MedicationReference, Prescription,
    UpdatePrescriptionReq,
};
pub use repositories::medications::{MedicationCatalog, TYPE_UNAVAILABLE};
pub use repositories::prescriptions::PrescriptionService;
