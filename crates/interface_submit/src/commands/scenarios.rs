use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ScenariosArgs {
    /// JSON scenario file to list instead of the built-in scenarios
    #[arg(long)]
    pub scenarios: Option<PathBuf>,
}

pub fn run(args: ScenariosArgs) -> anyhow::Result<()> {
    let catalog = super::load_catalog(args.scenarios.as_deref())?;
    for scenario in catalog.iter() {
        let kind = scenario
            .claim
            .leave_period_kind()
            .map(|k| k.as_str())
            .unwrap_or("invalid");
        let documents = scenario
            .claim
            .docs
            .keys()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");
        println!("{:<28} {:<36} {:<16} {}", scenario.name, scenario.claim.reason.as_str(), kind, documents);
    }
    Ok(())
}
