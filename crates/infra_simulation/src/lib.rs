//! Simulation Infrastructure
//!
//! Writes generated employers, employees, claims and documents to a fixture
//! directory and reads them back for submission.
//!
//! # Architecture
//!
//! - [`storage`]: the directory layout and JSON pool files
//! - [`writer`]: streaming `claims.json` / `claims.csv` writer
//! - [`dor`]: fixed-width Department of Revenue wage files
//! - [`simulation`]: the pipeline tying generation and storage together
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use domain_claims::{ScenarioCatalog, ScenarioMix};
//! use infra_simulation::{Simulation, SimulationConfig, SimulationStorage};
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
//! let mix = ScenarioMix::parse("medical_continuous=3,bonding_newborn=1").unwrap();
//! let simulation = Simulation::new(SimulationStorage::new("./data"), ScenarioCatalog::builtin());
//! let report = simulation.run(&SimulationConfig::new(7, as_of, 100, mix)).unwrap();
//! println!("wrote {} claims", report.claims);
//! ```

pub mod storage;
pub mod writer;
pub mod dor;
pub mod simulation;
pub mod error;

pub use storage::SimulationStorage;
pub use writer::{read_claim_index, read_claims, ClaimIndexRow, ClaimStreamWriter};
pub use dor::{ContributionRates, DorExporter, DorFiles};
pub use simulation::{Simulation, SimulationConfig, SimulationReport, PROGRESS_INTERVAL};
pub use error::SimulationError;
