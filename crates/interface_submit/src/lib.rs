//! Claim Submission Layer
//!
//! Replays generated claims against the claims REST API and hosts the
//! `claimgen` command line.
//!
//! # Architecture
//!
//! - **Client**: reqwest wrapper mapping HTTP failures to `PortError`
//! - **Submitter**: the `ClaimSubmitter` port and its REST adapter
//! - **Tracker**: append-only JSON-lines record of attempts
//! - **Runner**: bounded fan-out with consecutive-error cooldowns
//! - **Commands**: one module per CLI subcommand
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_submit::{ApiSubmitter, ClaimStateTracker, ClaimsApiClient, RunnerConfig, SubmissionRunner};
//!
//! let tracker = ClaimStateTracker::open(config.tracking_file()).await?;
//! let submitter = ApiSubmitter::new(ClaimsApiClient::from_config(&config)?, templates);
//! let runner = SubmissionRunner::new(Arc::new(submitter), Arc::new(tracker), RunnerConfig::from(&config));
//! let summary = runner.run(claims).await?;
//! ```

pub mod config;
pub mod error;
pub mod dto;
pub mod client;
pub mod submitter;
pub mod tracker;
pub mod runner;
pub mod commands;

pub use config::SubmitConfig;
pub use error::SubmitError;
pub use client::ClaimsApiClient;
pub use submitter::{ApiSubmitter, ClaimSubmitter, SubmissionReceipt};
pub use tracker::{ClaimStateTracker, SubmissionOutcome, TrackerEntry};
pub use runner::{RunnerConfig, SubmissionRunner, SubmissionSummary};
