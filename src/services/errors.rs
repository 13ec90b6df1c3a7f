use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub const NOT_FOUND_BY_ID_MESSAGE: &str = "Recurso não encontrado pelo id fornecido.";
pub const NOT_FOUND_MESSAGE: &str = "Recurso não encontrado";
pub const INTEGRITY_VIOLATION_MESSAGE: &str = "Falha de integridade referencial";

/// Failures surfaced by the service layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// No client exists with the requested id.
    #[error("{0}")]
    NotFound(String),

    /// Storage rejected the change because of a constraint, typically a row in
    /// another table still referencing the client.
    #[error("{0}")]
    IntegrityViolation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConstraintViolation(_) => {
                ServiceError::IntegrityViolation(INTEGRITY_VIOLATION_MESSAGE.to_string())
            }
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
