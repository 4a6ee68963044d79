//! Medication reference lookup.
//!
//! The reference dataset is a semicolon-delimited file where the medication
//! name sits at field index 1 and its type at field index 7. The catalog is
//! loaded once, kept in table order, and never mutated, so it is safe to share
//! behind an `Arc` across all in-flight requests.
//!
//! Matching semantics:
//! - [`MedicationCatalog::resolve`] — case-insensitive, whitespace-trimmed
//!   exact match; first match wins.
//! - [`MedicationCatalog::search`] — case-insensitive substring containment;
//!   returns matches in table order.
//!
//! Normalized keys are precomputed at load time so per-call work is a scan
//! over ready-made strings; the externally observable semantics are identical
//! to re-scanning the file.

use std::fs;
use std::path::Path;

use crate::error::{ClinicError, ClinicResult};
use crate::prescription::MedicationReference;

/// Sentinel substituted when the dataset leaves a medication's type blank.
pub const TYPE_UNAVAILABLE: &str = "Tipo não disponível";

const NAME_FIELD: usize = 1;
const TYPE_FIELD: usize = 7;
const MIN_FIELDS: usize = 8;

/// In-memory snapshot of the medication reference dataset.
#[derive(Clone, Debug)]
pub struct MedicationCatalog {
    rows: Vec<MedicationReference>,
    /// Normalized (trimmed, upper-cased) names, parallel to `rows`.
    keys: Vec<String>,
}

impl MedicationCatalog {
    /// Loads the catalog from a semicolon-delimited file.
    ///
    /// Blank lines are skipped. A blank type field is replaced with
    /// [`TYPE_UNAVAILABLE`].
    ///
    /// # Errors
    /// - [`ClinicError::ReferenceRead`] if the file cannot be read
    /// - [`ClinicError::ReferenceUnavailable`] if any non-empty line has
    ///   fewer than 8 fields
    pub fn load(path: &Path) -> ClinicResult<Self> {
        let text = fs::read_to_string(path).map_err(ClinicError::ReferenceRead)?;

        let mut rows = Vec::new();
        let mut keys = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(';').collect();
            if fields.len() < MIN_FIELDS {
                return Err(ClinicError::ReferenceUnavailable(format!(
                    "line {}: expected at least {} fields, found {}",
                    idx + 1,
                    MIN_FIELDS,
                    fields.len()
                )));
            }

            let name = fields[NAME_FIELD].trim();
            let kind = fields[TYPE_FIELD].trim();

            keys.push(normalize(name));
            rows.push(MedicationReference {
                name: name.to_string(),
                kind: if kind.is_empty() {
                    TYPE_UNAVAILABLE.to_string()
                } else {
                    kind.to_string()
                },
            });
        }

        Ok(Self { rows, keys })
    }

    /// Resolves a medication name to its reference row.
    ///
    /// # Errors
    /// - [`ClinicError::InvalidInput`] if `name` is blank
    /// - [`ClinicError::MedicationNotFound`] if no row matches
    pub fn resolve(&self, name: &str) -> ClinicResult<&MedicationReference> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(ClinicError::InvalidInput(
                "medication name cannot be empty".into(),
            ));
        }

        self.keys
            .iter()
            .position(|k| *k == key)
            .map(|i| &self.rows[i])
            .ok_or_else(|| ClinicError::MedicationNotFound(name.trim().to_string()))
    }

    /// Returns every row whose name contains `fragment`, in table order.
    ///
    /// # Errors
    /// - [`ClinicError::InvalidInput`] if `fragment` is blank
    /// - [`ClinicError::NoSearchMatches`] if no row matches
    pub fn search(&self, fragment: &str) -> ClinicResult<Vec<MedicationReference>> {
        let key = normalize(fragment);
        if key.is_empty() {
            return Err(ClinicError::InvalidInput(
                "search fragment cannot be empty".into(),
            ));
        }

        let matches: Vec<MedicationReference> = self
            .keys
            .iter()
            .zip(&self.rows)
            .filter(|(k, _)| k.contains(&key))
            .map(|(_, row)| row.clone())
            .collect();

        if matches.is_empty() {
            return Err(ClinicError::NoSearchMatches(fragment.trim().to_string()));
        }
        Ok(matches)
    }

    /// Every row, in table order.
    pub fn list_all(&self) -> &[MedicationReference] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}
