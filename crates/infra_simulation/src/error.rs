//! Simulation error types
//!
//! Wraps the domain errors raised while generating a fixture set together
//! with the I/O and encoding failures of writing it to disk.

use std::path::PathBuf;
use thiserror::Error;

use domain_claims::ClaimError;
use domain_documents::DocumentError;
use domain_employment::EmploymentError;

/// Errors that can occur while generating or storing a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A fixture file the operation depends on does not exist
    #[error("Missing simulation file: {}", .0.display())]
    MissingFile(PathBuf),

    /// A value does not fit its fixed-width DOR column
    #[error("Value '{value}' does not fit {field} (width {width})")]
    FieldTooWide {
        field: &'static str,
        width: usize,
        value: String,
    },

    /// The run was configured inconsistently
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("Claim generation failed: {0}")]
    Claim(#[from] ClaimError),

    #[error("Document generation failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Employment data error: {0}")]
    Employment(#[from] EmploymentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimulationError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SimulationError::InvalidConfig(message.into())
    }

    /// Checks if this error came from the filesystem rather than the data
    pub fn is_io(&self) -> bool {
        matches!(self, SimulationError::Io(_) | SimulationError::MissingFile(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_names_path() {
        let error = SimulationError::MissingFile(PathBuf::from("/tmp/sim/employers.json"));
        assert!(error.to_string().contains("employers.json"));
        assert!(error.is_io());
    }

    #[test]
    fn test_field_too_wide_message() {
        let error = SimulationError::FieldTooWide {
            field: "quarter_wages",
            width: 4,
            value: "12345.00".to_string(),
        };
        assert!(error.to_string().contains("quarter_wages"));
        assert!(!error.is_io());
    }
}
