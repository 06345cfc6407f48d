//! Leave Claims Domain
//!
//! This crate models paid-leave applications and generates synthetic ones
//! from named scenarios.
//!
//! # Generation
//!
//! ```text
//! ScenarioMix -> ScenarioSpec -> ClaimGenerator (+ EmployeeSource) -> GeneratedClaim
//! ```
//!
//! A generated claim carries the application body, the documents that
//! should accompany it, a payment preference and an optional employer
//! response. Once created it only changes when a rendered document is
//! attached.

pub mod claim;
pub mod generated;
pub mod scenario;
pub mod generator;
pub mod error;

pub use claim::{
    Claim, DurationBasis, FrequencyBasis, LeaveDetails, LeavePeriod, LeavePeriodKind, LeaveReason,
    ReasonQualifier, WeekdayMinutes, WorkPattern, WorkPatternDay, WorkPatternType,
};
pub use generated::{
    AccountType, DocumentConfig, DocumentRequest, DocumentType, EmployerDecision, EmployerResponse,
    FraudStatus, GeneratedClaim, PaymentPreference,
};
pub use scenario::{
    BondingDate, ClaimSpec, EmployerResponseSpec, IntermittentSpec, PaymentSpec, ScenarioCatalog,
    ScenarioMix, ScenarioSpec, WorkPatternSpec,
};
pub use generator::{ClaimGenerator, EmployeeSource, GeneratorConfig};
pub use error::ClaimError;
