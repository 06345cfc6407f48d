//! `claimgen` subcommands
//!
//! Each subcommand has an `Args` struct parsed by clap and a `run` function
//! taking the loaded [`SubmitConfig`].

pub mod employers;
pub mod employees;
pub mod generate;
pub mod dor;
pub mod submit;
pub mod scenarios;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use std::path::Path;

use domain_claims::ScenarioCatalog;
use domain_documents::TemplateStore;
use infra_simulation::{Simulation, SimulationStorage};

use crate::config::SubmitConfig;

/// Loads a scenario file, or the built-in catalog when none is given
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<ScenarioCatalog> {
    match path {
        Some(path) => ScenarioCatalog::from_json_file(path)
            .with_context(|| format!("failed to load scenarios from {}", path.display())),
        None => Ok(ScenarioCatalog::builtin()),
    }
}

pub fn templates(config: &SubmitConfig) -> TemplateStore {
    match &config.templates_dir {
        Some(dir) => TemplateStore::new(dir),
        None => TemplateStore::synthetic(),
    }
}

pub fn simulation(config: &SubmitConfig, catalog: ScenarioCatalog) -> Simulation {
    Simulation::new(SimulationStorage::new(&config.data_dir), catalog).with_templates(templates(config))
}

/// The given date, or today
pub fn as_of(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}
