//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Station identifier is empty or contains invalid characters
    #[error("Invalid station code: {0}")]
    InvalidStationCode(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
