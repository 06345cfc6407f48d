//! Core Kernel - Foundational types for the leave claim fixture workspace
//!
//! This crate provides the building blocks used across the generation and
//! submission crates:
//! - Money types with precise decimal arithmetic for wages and contributions
//! - Calendar quarters and inclusive date ranges
//! - Strongly-typed identifiers
//! - Port errors shared by adapters that talk to external systems

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, MoneyError, Rate};
pub use temporal::{DateRange, Quarter, TemporalError};
pub use identifiers::{ClaimId, EmployeeId, EmployerId};
pub use ports::{DomainPort, PortError};
