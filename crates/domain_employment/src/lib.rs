//! Employment Domain
//!
//! Synthetic employers and employees that seed generated claims and the
//! Department of Revenue wage files.
//!
//! # Generation
//!
//! ```text
//! EmployerSpec -> EmployerFactory -> EmployerPool
//! EmployeeSpec -> EmployeeFactory (picks an employer) -> EmployeePool
//! ```
//!
//! All randomness flows through a caller-supplied RNG so that a seeded run
//! reproduces the same records.

pub mod address;
pub mod employer;
pub mod employee;
pub mod factory;
pub mod pool;
pub mod validation;
pub mod error;

pub use address::Address;
pub use employer::{Employer, EmployerSize, EmployerSpec, QuarterlyWithholding};
pub use employee::{Employee, EmployeeSpec, Occupation, QuarterlyWage, WageSpec, MIN_ELIGIBLE_BASE_PERIOD_WAGES};
pub use factory::{EmployeeFactory, EmployerFactory, WAGE_HISTORY_QUARTERS};
pub use pool::{EmployeePool, EmployerPool};
pub use validation::{EmploymentValidator, ValidationResult};
pub use error::EmploymentError;
