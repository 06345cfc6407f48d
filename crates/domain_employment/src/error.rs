//! Employment domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur while generating or picking employment records
#[derive(Debug, Error)]
pub enum EmploymentError {
    /// Every employee matching the request has already been used
    #[error("Employee pool exhausted: {used} of {pool_size} employees already used and none match the request")]
    EmployeePoolExhausted { pool_size: usize, used: usize },

    /// An employee was requested but the employer pool is empty
    #[error("No employers available to attach the employee to")]
    NoEmployers,

    /// An employee spec named an employer that is not in the pool
    #[error("Employer not found: {0}")]
    EmployerNotFound(String),

    /// A record failed validation
    #[error("Employment record validation failed: {0}")]
    ValidationFailed(String),

    #[error("Wage calculation failed: {0}")]
    Money(#[from] MoneyError),
}

impl EmploymentError {
    /// Creates a ValidationFailed error from validation errors
    pub fn validation_failed(errors: Vec<String>) -> Self {
        EmploymentError::ValidationFailed(errors.join("; "))
    }
}
