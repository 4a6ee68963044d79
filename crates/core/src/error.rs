#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("prescription not found: {0}")]
    PrescriptionNotFound(String),
    #[error("medication not found: {0}")]
    MedicationNotFound(String),
    #[error("no medication name contains: {0}")]
    NoSearchMatches(String),
    #[error("invalid prescription id: {0}")]
    InvalidId(String),
    #[error("failed to read medication reference dataset: {0}")]
    ReferenceRead(std::io::Error),
    #[error("medication reference dataset is malformed: {0}")]
    ReferenceUnavailable(String),
    #[error("failed to create store directory: {0}")]
    StoreDirCreation(std::io::Error),
    #[error("failed to write prescription document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read prescription document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete prescription document: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize prescription: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize prescription: {0}")]
    Deserialization(serde_json::Error),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
