use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::Args;

use crate::config::SubmitConfig;

#[derive(Debug, Args)]
pub struct DorArgs {
    /// Date the reported quarters end before (default: today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Export timestamp used in the file names, e.g. 2024-05-15T09:30:00 (default: now)
    #[arg(long)]
    pub timestamp: Option<NaiveDateTime>,
}

pub fn run(config: &SubmitConfig, args: DorArgs) -> anyhow::Result<()> {
    let simulation = super::simulation(config, super::load_catalog(None)?);
    let storage = simulation.storage();
    let employers = storage.load_employers().context("failed to load employers")?;
    let employees = storage.load_employees().context("failed to load employees")?;

    let timestamp = args.timestamp.unwrap_or_else(|| Utc::now().naive_utc());
    let files = simulation
        .export_dor(&employers, &employees, super::as_of(args.as_of), timestamp)
        .context("failed to write DOR files")?;

    println!("Wrote {}", files.employer_file.display());
    println!("Wrote {}", files.wage_file.display());
    Ok(())
}
