use anyhow::Context;
use clap::Args;
use std::sync::Arc;

use infra_simulation::read_claims;

use crate::client::ClaimsApiClient;
use crate::config::SubmitConfig;
use crate::runner::{RunnerConfig, SubmissionRunner};
use crate::submitter::ApiSubmitter;
use crate::tracker::ClaimStateTracker;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Claims submitted at once (overrides CLAIMGEN_CONCURRENCY)
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Consecutive failures before a cooldown or halt
    #[arg(long)]
    pub max_consecutive_errors: Option<u32>,

    /// Submit at most this many claims from the file
    #[arg(short, long)]
    pub limit: Option<usize>,
}

pub async fn run(config: &SubmitConfig, args: SubmitArgs) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if args.max_consecutive_errors.is_some() {
        config.max_consecutive_errors = args.max_consecutive_errors;
    }
    config.validate()?;

    let simulation = super::simulation(&config, super::load_catalog(None)?);
    let mut claims = read_claims(&simulation.storage().claims_file()).context("failed to read claims")?;
    if let Some(limit) = args.limit {
        claims.truncate(limit);
    }

    let tracker = ClaimStateTracker::open(config.tracking_file())
        .await
        .context("failed to open tracking file")?;
    let client = ClaimsApiClient::from_config(&config)?;
    let submitter = ApiSubmitter::new(client, super::templates(&config));

    let runner = SubmissionRunner::new(Arc::new(submitter), Arc::new(tracker), RunnerConfig::from(&config));
    let summary = runner.run(claims).await?;

    println!(
        "Submitted {} claims, {} failed, {} skipped (tracking file {})",
        summary.submitted,
        summary.failed,
        summary.skipped,
        config.tracking_file().display()
    );
    Ok(())
}
