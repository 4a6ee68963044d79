//! Prescription document store.
//!
//! Documents are stored as one JSON file per prescription under
//! `<data_dir>/prescricoes/<32hex-uuid>.json`. The store exposes plain
//! insert/find/replace/delete semantics and knows nothing about enrichment or
//! validation; that belongs to the gateway in
//! [`crate::repositories::prescriptions`].

use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{ClinicError, ClinicResult};
use crate::prescription::Prescription;

/// File-backed prescription document collection.
#[derive(Clone, Debug)]
pub struct PrescriptionStore {
    dir: PathBuf,
}

impl PrescriptionStore {
    /// Opens the store, creating the document directory if it does not exist.
    ///
    /// # Errors
    /// Returns [`ClinicError::StoreDirCreation`] if the directory cannot be
    /// created.
    pub fn open(cfg: &CoreConfig) -> ClinicResult<Self> {
        let dir = cfg.prescriptions_dir();
        fs::create_dir_all(&dir).map_err(ClinicError::StoreDirCreation)?;
        Ok(Self { dir })
    }

    fn doc_path(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id.simple()))
    }

    /// Persists a new document. Overwrites nothing in practice because ids
    /// are freshly generated UUIDs.
    pub fn insert(&self, prescription: &Prescription) -> ClinicResult<()> {
        let id = parse_stored_id(&prescription.id)?;
        self.write_doc(&id, prescription)
    }

    /// Replaces the stored document with the given one (same id).
    pub fn replace(&self, prescription: &Prescription) -> ClinicResult<()> {
        let id = parse_stored_id(&prescription.id)?;
        self.write_doc(&id, prescription)
    }

    fn write_doc(&self, id: &Uuid, prescription: &Prescription) -> ClinicResult<()> {
        let json =
            serde_json::to_string_pretty(prescription).map_err(ClinicError::Serialization)?;
        fs::write(self.doc_path(id), json).map_err(ClinicError::FileWrite)
    }

    /// Returns the document with the given id, or `None` if absent.
    pub fn find_one(&self, id: &Uuid) -> ClinicResult<Option<Prescription>> {
        let path = self.doc_path(id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClinicError::FileRead(e)),
        };
        let prescription =
            serde_json::from_str(&json).map_err(ClinicError::Deserialization)?;
        Ok(Some(prescription))
    }

    /// Returns every stored document. Order is not guaranteed.
    ///
    /// Files that cannot be parsed are logged as warnings and skipped rather
    /// than failing the whole listing.
    pub fn find_all(&self) -> ClinicResult<Vec<Prescription>> {
        let mut prescriptions = Vec::new();

        let entries = fs::read_dir(&self.dir).map_err(ClinicError::FileRead)?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let json = fs::read_to_string(&path).map_err(ClinicError::FileRead)?;
            match serde_json::from_str::<Prescription>(&json) {
                Ok(prescription) => prescriptions.push(prescription),
                Err(e) => {
                    tracing::warn!("skipping unparseable document {}: {}", path.display(), e);
                }
            }
        }

        Ok(prescriptions)
    }

    /// Deletes the document with the given id. Returns `false` if no such
    /// document existed.
    pub fn delete(&self, id: &Uuid) -> ClinicResult<bool> {
        match fs::remove_file(self.doc_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ClinicError::FileDelete(e)),
        }
    }
}

fn parse_stored_id(id: &str) -> ClinicResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ClinicError::InvalidId(id.to_string()))
}
