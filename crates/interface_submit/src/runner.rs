//! Concurrent submission runner

use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use core_kernel::{ClaimId, PortError};
use domain_claims::GeneratedClaim;

use crate::config::SubmitConfig;
use crate::error::SubmitError;
use crate::submitter::{ClaimSubmitter, SubmissionReceipt};
use crate::tracker::{ClaimStateTracker, SubmissionOutcome, TrackerEntry};

/// Pacing of a submission run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub concurrency: usize,
    pub max_consecutive_errors: Option<u32>,
    pub cooldown: Duration,
    pub max_cooldowns: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            max_consecutive_errors: None,
            cooldown: Duration::from_secs(60),
            max_cooldowns: 1,
        }
    }
}

impl From<&SubmitConfig> for RunnerConfig {
    fn from(config: &SubmitConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            max_consecutive_errors: config.max_consecutive_errors,
            cooldown: config.cooldown(),
            max_cooldowns: config.max_cooldowns,
        }
    }
}

/// Counts of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub submitted: usize,
    pub failed: usize,
    /// Claims already present in the tracking file
    pub skipped: usize,
}

/// What the run does once the in-flight claims have finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pause {
    None,
    Cooldown,
    /// Halt, reporting the consecutive count that triggered it
    Halt(u32),
}

/// Submits claims with bounded concurrency, recording every attempt
pub struct SubmissionRunner<S> {
    submitter: Arc<S>,
    tracker: Arc<ClaimStateTracker>,
    config: RunnerConfig,
}

impl<S: ClaimSubmitter> SubmissionRunner<S> {
    pub fn new(submitter: Arc<S>, tracker: Arc<ClaimStateTracker>, config: RunnerConfig) -> Self {
        Self {
            submitter,
            tracker,
            config,
        }
    }

    pub fn tracker(&self) -> &ClaimStateTracker {
        &self.tracker
    }

    /// Submits every claim not yet in the tracker
    ///
    /// Failures are counted in completion order and a success resets the
    /// count. Reaching `max_consecutive_errors` stops new claims from
    /// starting and lets the in-flight ones finish and be recorded. Then the
    /// run pauses for the cooldown while cooldowns remain and halts
    /// otherwise. Claims repeated in `claims` are submitted once.
    pub async fn run(&self, claims: Vec<GeneratedClaim>) -> Result<SubmissionSummary, SubmitError> {
        let mut summary = SubmissionSummary::default();
        let mut pending = Vec::with_capacity(claims.len());
        let mut queued = HashSet::with_capacity(claims.len());
        for claim in claims {
            if self.tracker.contains(&claim.id).await {
                debug!(claim_id = %claim.id, "Skipping claim already in tracking file");
                summary.skipped += 1;
            } else if !queued.insert(claim.id) {
                debug!(claim_id = %claim.id, "Skipping duplicate claim");
                summary.skipped += 1;
            } else {
                pending.push(claim);
            }
        }

        let concurrency = self.config.concurrency.max(1);
        info!(
            pending = pending.len(),
            skipped = summary.skipped,
            concurrency,
            "Starting submission run"
        );

        let mut queue = pending.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut consecutive: u32 = 0;
        let mut cooldowns: u32 = 0;
        let mut pause = Pause::None;

        loop {
            if pause == Pause::None {
                while in_flight.len() < concurrency {
                    match queue.next() {
                        Some(claim) => in_flight.push(self.submit_one(claim)),
                        None => break,
                    }
                }
            }

            let Some(result) = in_flight.next().await else {
                match pause {
                    Pause::None => break,
                    Pause::Cooldown if queue.len() == 0 => break,
                    Pause::Cooldown => {
                        warn!(
                            cooldown_secs = self.config.cooldown.as_secs(),
                            remaining = self.config.max_cooldowns - cooldowns,
                            "Cooling down"
                        );
                        tokio::time::sleep(self.config.cooldown).await;
                        consecutive = 0;
                        pause = Pause::None;
                        continue;
                    }
                    Pause::Halt(at) => {
                        error!(consecutive = at, cooldowns, "Too many consecutive errors, halting");
                        return Err(SubmitError::TooManyConsecutiveErrors {
                            consecutive: at,
                            submitted: summary.submitted,
                            failed: summary.failed,
                            cooldowns,
                        });
                    }
                }
            };

            let (claim_id, outcome) = result?;
            match outcome {
                Ok(receipt) => {
                    summary.submitted += 1;
                    consecutive = 0;
                    debug!(claim_id = %claim_id, application_id = %receipt.application_id, "Claim submitted");
                }
                Err(e) => {
                    summary.failed += 1;
                    consecutive += 1;
                    warn!(
                        claim_id = %claim_id,
                        consecutive,
                        transient = e.is_transient(),
                        retry_after_secs = e.retry_after().map(|d| d.as_secs()),
                        error = %e,
                        "Claim submission failed"
                    );

                    // Claims already in flight when the threshold was hit
                    // are drained without counting toward another pause
                    if pause != Pause::None {
                        continue;
                    }
                    let Some(max) = self.config.max_consecutive_errors else {
                        continue;
                    };
                    if consecutive < max {
                        continue;
                    }
                    if cooldowns < self.config.max_cooldowns {
                        cooldowns += 1;
                        warn!(
                            consecutive,
                            in_flight = in_flight.len(),
                            "Too many consecutive errors, draining before cooldown"
                        );
                        pause = Pause::Cooldown;
                    } else {
                        warn!(
                            consecutive,
                            in_flight = in_flight.len(),
                            "Too many consecutive errors, draining before halt"
                        );
                        pause = Pause::Halt(consecutive);
                    }
                }
            }
        }

        info!(
            submitted = summary.submitted,
            failed = summary.failed,
            skipped = summary.skipped,
            "Submission run complete"
        );
        Ok(summary)
    }

    /// Submits one claim and records the attempt before returning
    async fn submit_one(
        &self,
        claim: GeneratedClaim,
    ) -> Result<(ClaimId, Result<SubmissionReceipt, PortError>), SubmitError> {
        let result = self.submitter.submit(&claim).await;
        let outcome = match &result {
            Ok(receipt) => SubmissionOutcome::Submitted {
                receipt: receipt.clone(),
            },
            Err(e) => SubmissionOutcome::Failed { error: e.to_string() },
        };
        self.tracker.record(TrackerEntry::new(claim.id, outcome)).await?;
        Ok((claim.id, result))
    }
}
