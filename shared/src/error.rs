//! Error taxonomy for the recommendation engine

use thiserror::Error;

/// Errors surfaced by engine operations
///
/// Per-candidate data gaps never appear here: a crop without weather or price data is
/// simply excluded from the candidate set. Only whole-request failures are errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed input, rejected before any computation
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// An identifier that the catalog does not know
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// Reference data is present but cannot be used
    #[error("Invalid catalog record: {0}")]
    InvalidCatalog(String),
}

impl EngineError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn parcel_not_found(parcel_id: &str) -> Self {
        EngineError::NotFound {
            resource: "Parcel".to_string(),
            id: parcel_id.to_string(),
        }
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
