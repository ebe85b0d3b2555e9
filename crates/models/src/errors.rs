use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed record: {0}")]
    Malformed(String),
}
