//! Generation pipeline
//!
//! ```text
//! employers.json / employees.json (loaded or generated)
//!   -> ClaimGenerator (per scenario in the mix)
//!   -> DocumentRegistry::render_all -> documents/<claim id>/*.pdf
//!   -> ClaimStreamWriter -> claims.json + claims.csv
//!   -> used_employees.json, optional DOR export
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use core_kernel::Quarter;
use domain_claims::{ClaimGenerator, EmployeeSource, GeneratedClaim, GeneratorConfig, ScenarioCatalog, ScenarioMix};
use domain_documents::{DocumentRegistry, TemplateStore};
use domain_employment::{
    EmployeePool, EmployeeSpec, EmployerPool, EmployerSpec, WAGE_HISTORY_QUARTERS,
};

use crate::dor::{DorExporter, DorFiles};
use crate::error::SimulationError;
use crate::storage::SimulationStorage;
use crate::writer::ClaimStreamWriter;

/// Claims between progress log lines
pub const PROGRESS_INTERVAL: usize = 100;

/// Settings of one generation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub as_of: NaiveDate,
    /// Employers to generate when none are stored
    pub employers: usize,
    /// Employees to generate when none are stored
    pub employees: usize,
    pub claims: usize,
    pub mix: ScenarioMix,
    pub allow_new_employees: bool,
    pub write_documents: bool,
    /// Export DOR files stamped with this time
    pub dor_timestamp: Option<NaiveDateTime>,
}

impl SimulationConfig {
    pub fn new(seed: u64, as_of: NaiveDate, claims: usize, mix: ScenarioMix) -> Self {
        Self {
            seed,
            as_of,
            employers: 10,
            employees: claims.max(1),
            claims,
            mix,
            allow_new_employees: true,
            write_documents: true,
            dor_timestamp: None,
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub employers: usize,
    pub employees: usize,
    pub claims: usize,
    pub documents: usize,
    pub dor: Option<DorFiles>,
}

/// Generates a fixture set into a [`SimulationStorage`]
pub struct Simulation {
    storage: SimulationStorage,
    catalog: ScenarioCatalog,
    registry: DocumentRegistry,
    templates: TemplateStore,
}

impl Simulation {
    pub fn new(storage: SimulationStorage, catalog: ScenarioCatalog) -> Self {
        Self {
            storage,
            catalog,
            registry: DocumentRegistry::standard(),
            templates: TemplateStore::synthetic(),
        }
    }

    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_registry(mut self, registry: DocumentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn storage(&self) -> &SimulationStorage {
        &self.storage
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Loads stored employers or generates and saves `count` new ones
    pub fn employers(&self, count: usize, seed: u64, as_of: NaiveDate) -> Result<EmployerPool, SimulationError> {
        if self.storage.has_employers() {
            let employers = self.storage.load_employers()?;
            debug!(count = employers.len(), "Loaded stored employers");
            return Ok(employers);
        }
        self.generate_employers(count, &EmployerSpec::default(), seed, as_of)
    }

    /// Generates `count` employers, replacing any stored ones
    pub fn generate_employers(
        &self,
        count: usize,
        spec: &EmployerSpec,
        seed: u64,
        as_of: NaiveDate,
    ) -> Result<EmployerPool, SimulationError> {
        if count == 0 {
            return Err(SimulationError::invalid_config("at least one employer is required"));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let employers = EmployerPool::generate(count, spec, as_of, &mut rng);
        self.storage.save_employers(&employers)?;
        Ok(employers)
    }

    /// Loads stored employees or generates and saves `count` new ones
    pub fn employees(
        &self,
        count: usize,
        employers: &EmployerPool,
        seed: u64,
        as_of: NaiveDate,
    ) -> Result<EmployeePool, SimulationError> {
        if self.storage.has_employees() {
            let employees = self.storage.load_employees()?;
            debug!(count = employees.len(), "Loaded stored employees");
            return Ok(employees);
        }
        self.generate_employees(count, employers, seed, as_of)
    }

    /// Generates `count` employees, replacing any stored ones
    ///
    /// The pool is mostly eligible employees holding a Massachusetts ID,
    /// with a tenth ineligible earners and a tenth without an ID
    /// requirement.
    pub fn generate_employees(
        &self,
        count: usize,
        employers: &EmployerPool,
        seed: u64,
        as_of: NaiveDate,
    ) -> Result<EmployeePool, SimulationError> {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let ineligible = count / 10;
        let without_id = count / 10;
        let with_id = count - ineligible - without_id;

        let mut generated = Vec::with_capacity(count);
        for (spec, n) in [
            (EmployeeSpec::eligible().with_mass_id(), with_id),
            (EmployeeSpec::eligible(), without_id),
            (EmployeeSpec::ineligible(), ineligible),
        ] {
            let pool = EmployeePool::generate(n, &spec, employers, as_of, &mut rng)?;
            generated.extend(pool.iter().cloned());
        }

        let employees = EmployeePool::new(generated);
        self.storage.save_employees(&employees)?;
        Ok(employees)
    }

    /// Writes DOR files for the quarters of wage history ending before `as_of`
    pub fn export_dor(
        &self,
        employers: &EmployerPool,
        employees: &EmployeePool,
        as_of: NaiveDate,
        timestamp: NaiveDateTime,
    ) -> Result<DorFiles, SimulationError> {
        let quarters = Quarter::last_n(as_of, WAGE_HISTORY_QUARTERS);
        DorExporter::new(timestamp).export(&self.storage.dor_dir(), employers, employees, &quarters)
    }

    /// Renders and writes every document `claim` requests, recording the paths
    pub fn write_documents(&self, claim: &mut GeneratedClaim) -> Result<usize, SimulationError> {
        let rendered = self.registry.render_all(claim, &self.templates)?;
        let count = rendered.len();
        for document in rendered {
            let path = self.storage.document_file(&claim.id, document.document_type);
            self.storage.write_bytes(&path, &document.bytes)?;
            claim.attach_document(document.document_type, path)?;
        }
        Ok(count)
    }

    /// Runs the whole pipeline
    pub fn run(&self, config: &SimulationConfig) -> Result<SimulationReport, SimulationError> {
        config.mix.validate(&self.catalog)?;
        self.storage.prepare()?;

        let employers = self.employers(config.employers, config.seed, config.as_of)?;
        let mut employees = self.employees(config.employees, &employers, config.seed, config.as_of)?;

        let dor = match config.dor_timestamp {
            Some(timestamp) => Some(self.export_dor(&employers, &employees, config.as_of, timestamp)?),
            None => None,
        };

        info!(
            claims = config.claims,
            employers = employers.len(),
            employees = employees.len(),
            seed = config.seed,
            "Starting simulation"
        );

        let mut generator = ClaimGenerator::new(GeneratorConfig {
            seed: config.seed,
            as_of: config.as_of,
        });
        let mut writer = ClaimStreamWriter::create(&self.storage)?;
        let mut documents = 0;

        {
            let mut source = EmployeeSource::Pool {
                employees: &mut employees,
                employers: &employers,
                allow_new_employees: config.allow_new_employees,
            };

            for (name, count) in config.mix.counts(config.claims) {
                let scenario = self.catalog.get(&name)?;
                for _ in 0..count {
                    let mut claim = generator.generate(scenario, &mut source)?;
                    if config.write_documents {
                        documents += self.write_documents(&mut claim)?;
                    }
                    writer.write(&claim)?;

                    if writer.written() % PROGRESS_INTERVAL == 0 {
                        info!(written = writer.written(), total = config.claims, "Simulation progress");
                    }
                }
            }
        }

        let claims = writer.finish()?;
        self.storage.save_employees(&employees)?;

        info!(claims, documents, "Simulation complete");
        Ok(SimulationReport {
            employers: employers.len(),
            employees: employees.len(),
            claims,
            documents,
            dor,
        })
    }
}

