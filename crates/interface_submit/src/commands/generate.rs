use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

use domain_claims::ScenarioMix;
use infra_simulation::SimulationConfig;

use crate::config::SubmitConfig;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of claims to generate
    #[arg(short = 'n', long, default_value_t = 100)]
    pub claims: usize,

    /// Weighted scenario mix, e.g. "medical_continuous=3,bonding_newborn=1"
    #[arg(short, long, default_value = "medical_continuous")]
    pub mix: String,

    /// JSON scenario file replacing the built-in scenarios
    #[arg(long)]
    pub scenarios: Option<PathBuf>,

    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    pub seed: u64,

    /// Date leave is generated relative to (default: today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Employers to generate when none are stored
    #[arg(long, default_value_t = 10)]
    pub employers: usize,

    /// Employees to generate when none are stored (default: one per claim)
    #[arg(long)]
    pub employees: Option<usize>,

    /// Fail instead of generating new employees when the pool runs out
    #[arg(long)]
    pub no_new_employees: bool,

    /// Skip rendering PDF documents
    #[arg(long)]
    pub no_documents: bool,

    /// Also write DOR files
    #[arg(long)]
    pub dor: bool,
}

pub fn run(config: &SubmitConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let catalog = super::load_catalog(args.scenarios.as_deref())?;
    let mix = ScenarioMix::parse(&args.mix).with_context(|| format!("invalid scenario mix '{}'", args.mix))?;

    let mut simulation_config = SimulationConfig::new(args.seed, super::as_of(args.as_of), args.claims, mix);
    simulation_config.employers = args.employers;
    if let Some(employees) = args.employees {
        simulation_config.employees = employees;
    }
    simulation_config.allow_new_employees = !args.no_new_employees;
    simulation_config.write_documents = !args.no_documents;
    if args.dor {
        simulation_config.dor_timestamp = Some(chrono::Utc::now().naive_utc());
    }

    let simulation = super::simulation(config, catalog);
    let report = simulation.run(&simulation_config).context("simulation failed")?;

    println!(
        "Generated {} claims with {} documents ({} employers, {} employees) in {}",
        report.claims,
        report.documents,
        report.employers,
        report.employees,
        simulation.storage().root().display()
    );
    if let Some(dor) = report.dor {
        println!("DOR files: {} {}", dor.employer_file.display(), dor.wage_file.display());
    }
    Ok(())
}
