//! Prescription store gateway.
//!
//! Translates CRUD requests into document-store operations and shapes the
//! stored documents: identifier generation and normalization, presence checks
//! on required fields, and medication enrichment through the
//! [`MedicationCatalog`].
//!
//! Enrichment happens before anything touches the store, so a create or
//! update either fully applies enriched data or fails without mutating
//! durable state.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{ClinicError, ClinicResult};
use crate::prescription::{
    CreatePrescriptionReq, MedicationEntry, Prescription, UpdatePrescriptionReq,
};
use crate::repositories::medications::MedicationCatalog;
use crate::store::PrescriptionStore;

/// Service handling the prescription CRUD lifecycle.
#[derive(Clone, Debug)]
pub struct PrescriptionService {
    store: PrescriptionStore,
    catalog: Arc<MedicationCatalog>,
}

impl PrescriptionService {
    /// Creates the service, opening the underlying document store.
    ///
    /// # Errors
    /// Returns `ClinicError` if the store directory cannot be created.
    pub fn new(cfg: &CoreConfig, catalog: Arc<MedicationCatalog>) -> ClinicResult<Self> {
        Ok(Self {
            store: PrescriptionStore::open(cfg)?,
            catalog,
        })
    }

    /// Creates a prescription from a validated payload.
    ///
    /// Stamps `criado_em`, enriches every medication entry that carries a
    /// `nome`, generates the identifier, and persists the document.
    ///
    /// # Errors
    /// - [`ClinicError::InvalidInput`] if `paciente_id` or `medico_id` is
    ///   missing/blank, or `medicamentos` is empty
    /// - [`ClinicError::MedicationNotFound`] naming the first entry whose
    ///   `nome` does not resolve; nothing is persisted in that case
    pub fn create(&self, req: CreatePrescriptionReq) -> ClinicResult<Prescription> {
        let patient_id = required(req.patient_id, "paciente_id")?;
        let prescriber_id = required(req.prescriber_id, "medico_id")?;

        let mut medications = req.medications;
        if medications.is_empty() {
            return Err(ClinicError::InvalidInput(
                "medicamentos cannot be empty".into(),
            ));
        }
        self.enrich_all(&mut medications)?;

        let prescription = Prescription {
            id: Uuid::new_v4().simple().to_string(),
            patient_id,
            prescriber_id,
            medications,
            created_at: Utc::now(),
        };
        self.store.insert(&prescription)?;

        tracing::info!("created prescription {}", prescription.id);
        Ok(prescription)
    }

    /// Returns all stored prescriptions. Order is not guaranteed.
    pub fn list(&self) -> ClinicResult<Vec<Prescription>> {
        self.store.find_all()
    }

    /// Returns the prescription with the given id.
    ///
    /// # Errors
    /// - [`ClinicError::InvalidId`] if `id` is not a well-formed UUID
    /// - [`ClinicError::PrescriptionNotFound`] if no document matches
    pub fn get(&self, id: &str) -> ClinicResult<Prescription> {
        let uuid = parse_id(id)?;
        self.store
            .find_one(&uuid)?
            .ok_or_else(|| ClinicError::PrescriptionNotFound(id.to_string()))
    }

    /// Applies a sparse update to the prescription with the given id.
    ///
    /// Only `paciente_id` and `medicamentos` are applied; every other stored
    /// field is preserved. A supplied `medicamentos` list is re-enriched
    /// exactly as in [`Self::create`].
    ///
    /// # Errors
    /// - [`ClinicError::InvalidInput`] if neither recognized field is present,
    ///   a supplied `paciente_id` is blank, or a supplied `medicamentos` is
    ///   empty
    /// - [`ClinicError::InvalidId`] if `id` is not a well-formed UUID
    /// - [`ClinicError::PrescriptionNotFound`] if no document matches
    /// - [`ClinicError::MedicationNotFound`] naming the first entry that does
    ///   not resolve; the stored document is left untouched in that case
    pub fn update(&self, id: &str, req: UpdatePrescriptionReq) -> ClinicResult<Prescription> {
        if req.patient_id.is_none() && req.medications.is_none() {
            return Err(ClinicError::InvalidInput(
                "payload contains no updatable field".into(),
            ));
        }

        let uuid = parse_id(id)?;
        let mut doc = self
            .store
            .find_one(&uuid)?
            .ok_or_else(|| ClinicError::PrescriptionNotFound(id.to_string()))?;

        if let Some(patient_id) = req.patient_id {
            doc.patient_id = required(Some(patient_id), "paciente_id")?;
        }
        if let Some(mut medications) = req.medications {
            if medications.is_empty() {
                return Err(ClinicError::InvalidInput(
                    "medicamentos cannot be empty".into(),
                ));
            }
            self.enrich_all(&mut medications)?;
            doc.medications = medications;
        }

        self.store.replace(&doc)?;

        tracing::info!("updated prescription {}", doc.id);
        Ok(doc)
    }

    /// Deletes the prescription with the given id.
    ///
    /// # Errors
    /// - [`ClinicError::InvalidId`] if `id` is not a well-formed UUID
    /// - [`ClinicError::PrescriptionNotFound`] if no document matches
    pub fn delete(&self, id: &str) -> ClinicResult<()> {
        let uuid = parse_id(id)?;
        if !self.store.delete(&uuid)? {
            return Err(ClinicError::PrescriptionNotFound(id.to_string()));
        }
        tracing::info!("deleted prescription {}", id);
        Ok(())
    }

    /// Enriches every entry that carries a lookup name, consuming the name.
    ///
    /// Fails on the first entry whose name does not resolve, before any
    /// durable write has happened.
    fn enrich_all(&self, medications: &mut [MedicationEntry]) -> ClinicResult<()> {
        for entry in medications.iter_mut() {
            if let Some(name) = entry.name.take() {
                entry.reference = Some(self.catalog.resolve(&name)?.clone());
            }
        }
        Ok(())
    }
}

fn required(value: Option<String>, field: &str) -> ClinicResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ClinicError::InvalidInput(format!(
            "{field} is required and cannot be empty"
        ))),
    }
}

fn parse_id(id: &str) -> ClinicResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ClinicError::InvalidId(id.to_string()))
}
