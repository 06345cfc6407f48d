//! Port errors and the port marker trait
//!
//! Anything that leaves the process (today only the claims REST API) sits
//! behind a trait defined by the crate that needs it. Those traits extend
//! [`DomainPort`] and fail with [`PortError`], so the submission runner can
//! count, log and record failures without knowing which adapter produced
//! them.
//!
//! ```text
//! SubmissionRunner ──> ClaimSubmitter ──> ApiSubmitter (reqwest)
//!                                    └──> test doubles
//! ```

use std::fmt;
use std::time::Duration;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a call through a port
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    /// Request rejected as invalid; `field` names the offending field when known
    #[error("rejected as invalid: {message}")]
    Validation { message: String, field: Option<String> },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("could not connect: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("{operation} timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// Missing, expired or insufficient credentials
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("{service} unavailable")]
    ServiceUnavailable { service: String },

    /// A request or response body could not be built or parsed
    #[error("could not transform payload: {message}")]
    Transformation { message: String },

    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// True for failures a later attempt may not hit: network trouble,
    /// timeouts, throttling and 5xx responses
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// How long the remote side asked us to back off, if it said
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            PortError::RateLimited { retry_after_secs } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }
}

/// Marker for port traits; adapters are shared across tokio tasks
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_entity_and_id() {
        let error = PortError::not_found("Application", "app-123");
        assert_eq!(error.to_string(), "Application app-123 not found");
        assert!(!error.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        let timeout = PortError::Timeout {
            operation: "submit_application".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());
        assert!(PortError::ServiceUnavailable { service: "claims API".into() }.is_transient());

        let validation = PortError::Validation {
            message: "invalid tax identifier".to_string(),
            field: Some("tax_identifier".to_string()),
        };
        assert!(!validation.is_transient());
        assert!(!PortError::Unauthorized { message: "expired".into() }.is_transient());
    }

    #[test]
    fn test_retry_after_only_for_rate_limits() {
        let limited = PortError::RateLimited { retry_after_secs: 7 };
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(PortError::internal("boom").retry_after(), None);
    }
}
