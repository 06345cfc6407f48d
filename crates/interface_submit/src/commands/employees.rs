use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;

use crate::config::SubmitConfig;

#[derive(Debug, Args)]
pub struct EmployeesArgs {
    /// Number of employees to generate
    #[arg(short, long, default_value_t = 100)]
    pub count: usize,

    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    pub seed: u64,

    /// Date wage history is generated up to (default: today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run(config: &SubmitConfig, args: EmployeesArgs) -> anyhow::Result<()> {
    let simulation = super::simulation(config, super::load_catalog(None)?);
    let employers = simulation
        .storage()
        .load_employers()
        .context("employers must be generated before employees")?;

    let employees = simulation
        .generate_employees(args.count, &employers, args.seed, super::as_of(args.as_of))
        .context("failed to generate employees")?;

    println!(
        "Wrote {} employees across {} employers to {}",
        employees.len(),
        employers.len(),
        simulation.storage().employees_file().display()
    );
    Ok(())
}
