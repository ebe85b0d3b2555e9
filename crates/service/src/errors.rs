use thiserror::Error;

/// The display strings of the three miss variants are part of the HTTP
/// contract; the server layer sends them verbatim as response bodies.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Health record with id={0} not found")]
    NotFound(String),
    #[error("Couldn't update health record with id={0}. Record not found.")]
    UpdateTargetMissing(String),
    #[error("Couldn't delete health record with id={0}. Record not found.")]
    DeleteTargetMissing(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}
