use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;

use domain_employment::{EmployerSize, EmployerSpec};

use crate::config::SubmitConfig;

#[derive(Debug, Args)]
pub struct EmployersArgs {
    /// Number of employers to generate
    #[arg(short, long, default_value_t = 10)]
    pub count: usize,

    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    pub seed: u64,

    /// Date wage history is generated up to (default: today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Generate only employers of this size (small, medium, large)
    #[arg(long)]
    pub size: Option<String>,

    /// Mark every employer exempt from family leave contributions
    #[arg(long)]
    pub family_exemption: bool,

    /// Mark every employer exempt from medical leave contributions
    #[arg(long)]
    pub medical_exemption: bool,
}

fn parse_size(size: &str) -> anyhow::Result<EmployerSize> {
    match size.to_ascii_lowercase().as_str() {
        "small" => Ok(EmployerSize::Small),
        "medium" => Ok(EmployerSize::Medium),
        "large" => Ok(EmployerSize::Large),
        other => anyhow::bail!("unknown employer size '{}'", other),
    }
}

pub fn run(config: &SubmitConfig, args: EmployersArgs) -> anyhow::Result<()> {
    let spec = EmployerSpec {
        size: args.size.as_deref().map(parse_size).transpose()?,
        family_exemption: args.family_exemption,
        medical_exemption: args.medical_exemption,
        ..Default::default()
    };

    let simulation = super::simulation(config, super::load_catalog(None)?);
    let employers = simulation
        .generate_employers(args.count, &spec, args.seed, super::as_of(args.as_of))
        .context("failed to generate employers")?;

    println!(
        "Wrote {} employers to {}",
        employers.len(),
        simulation.storage().employers_file().display()
    );
    Ok(())
}
