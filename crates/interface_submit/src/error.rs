//! Submission error handling

use thiserror::Error;

use core_kernel::PortError;
use domain_documents::DocumentError;
use infra_simulation::SimulationError;

/// Errors that stop a submission run or a CLI command
///
/// Individual claim failures are reported as [`PortError`]s, recorded in the
/// tracking file and counted; only configuration, storage and the
/// consecutive-error threshold abort a run.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The consecutive-failure threshold was reached with no cooldowns left
    #[error("Halted after {consecutive} consecutive errors ({submitted} submitted, {failed} failed, {cooldowns} cooldowns used)")]
    TooManyConsecutiveErrors {
        consecutive: u32,
        submitted: usize,
        failed: usize,
        cooldowns: u32,
    },

    #[error("Claims API error: {0}")]
    Port(#[from] PortError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Tracking file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SubmitError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SubmitError::InvalidConfig(message.into())
    }
}
