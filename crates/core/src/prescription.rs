//! Prescription data model and operation payloads.
//!
//! Wire field names are Portuguese (`paciente_id`, `medico_id`,
//! `medicamentos`, `criado_em`) to match the documented HTTP contract; Rust
//! field names stay English.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the medication reference dataset.
///
/// `kind` carries the sentinel value when the source field was blank, so a
/// reference attached to a prescription is always fully populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MedicationReference {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
}

/// One line item within a prescription.
///
/// Caller-supplied fields other than `nome` (dose, frequency, free text) are
/// opaque to the service and pass through unmodified. Enrichment consumes
/// `nome` and attaches `informacoes_medicamento` in its place: an entry stores
/// the resolved reference, never the raw lookup string.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicationEntry {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "informacoes_medicamento",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference: Option<MedicationReference>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// One prescribing event.
///
/// Invariant: never persisted without a patient, a prescriber, and at least
/// one medication entry. `id` and `criado_em` are set at creation and
/// immutable thereafter.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Prescription {
    pub id: String,
    #[serde(rename = "paciente_id")]
    pub patient_id: String,
    #[serde(rename = "medico_id")]
    pub prescriber_id: String,
    #[serde(rename = "medicamentos")]
    pub medications: Vec<MedicationEntry>,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a prescription.
///
/// All fields are optional at the serde level so that a missing field is
/// reported as a validation error by the gateway rather than a
/// deserialization rejection by the transport.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreatePrescriptionReq {
    #[serde(rename = "paciente_id", default)]
    pub patient_id: Option<String>,
    #[serde(rename = "medico_id", default)]
    pub prescriber_id: Option<String>,
    #[serde(rename = "medicamentos", default)]
    pub medications: Vec<MedicationEntry>,
}

/// Sparse payload for updating a prescription.
///
/// Only `paciente_id` and `medicamentos` are recognized; anything else in the
/// request body is ignored.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePrescriptionReq {
    #[serde(rename = "paciente_id", default)]
    pub patient_id: Option<String>,
    #[serde(rename = "medicamentos", default)]
    pub medications: Option<Vec<MedicationEntry>>,
}
