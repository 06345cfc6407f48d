//! Claims domain errors

use thiserror::Error;

use domain_employment::EmploymentError;

use crate::generated::DocumentType;

/// Errors that can occur while building or generating claims
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Zero or several leave-period flags, or a reason/qualifier pair the
    /// claims system does not accept
    #[error("Unsupported leave combination: {0}")]
    UnsupportedLeaveCombination(String),

    #[error("Employee pool exhausted for scenario {scenario}: all {pool_size} employees used ({used} marked used)")]
    EmployeePoolExhausted {
        scenario: String,
        pool_size: usize,
        used: usize,
    },

    #[error("No employer available to attach a new employee to")]
    MissingEmployer,

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Invalid scenario mix: {0}")]
    InvalidMix(String),

    #[error("Document {0:?} was not requested for this claim")]
    DocumentNotRequested(DocumentType),

    #[error("Employment error: {0}")]
    Employment(#[from] EmploymentError),

    #[error("Failed to read scenario catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario catalog: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClaimError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        ClaimError::UnsupportedLeaveCombination(message.into())
    }

    pub fn missing(field: impl Into<String>) -> Self {
        ClaimError::MissingRequiredField(field.into())
    }
}
