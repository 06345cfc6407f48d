//! Submission state tracking
//!
//! Every attempt is appended to a JSON-lines file, one entry per line, so a
//! rerun can skip claims that were already tried. The file is only ever
//! appended to; writes go through a mutex so concurrent workers never
//! interleave lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use core_kernel::ClaimId;

use crate::error::SubmitError;
use crate::submitter::SubmissionReceipt;

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Submitted { receipt: SubmissionReceipt },
    Failed { error: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted { .. })
    }
}

/// One line of the tracking file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEntry {
    pub claim_id: ClaimId,
    pub outcome: SubmissionOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl TrackerEntry {
    pub fn new(claim_id: ClaimId, outcome: SubmissionOutcome) -> Self {
        Self {
            claim_id,
            outcome,
            recorded_at: Utc::now(),
        }
    }
}

struct TrackerState {
    file: File,
    entries: Vec<TrackerEntry>,
    seen: HashSet<ClaimId>,
}

/// Append-only record of submission attempts
pub struct ClaimStateTracker {
    path: PathBuf,
    state: Mutex<TrackerState>,
}

impl ClaimStateTracker {
    /// Loads the existing entries of `path` and opens it for appending
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SubmitError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut entries = Vec::new();
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                for (number, line) in contents.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<TrackerEntry>(line) {
                        Ok(entry) => entries.push(entry),
                        Err(e) => warn!(
                            file = %path.display(),
                            line = number + 1,
                            error = %e,
                            "Skipping malformed tracking entry"
                        ),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let seen = entries.iter().map(|e| e.claim_id).collect();
        let file = OpenOptions::new().create(true).append(true).open(&path).await?;
        debug!(file = %path.display(), entries = entries.len(), "Opened tracking file");

        Ok(Self {
            path,
            state: Mutex::new(TrackerState { file, entries, seen }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if any attempt was recorded for `claim_id`
    pub async fn contains(&self, claim_id: &ClaimId) -> bool {
        self.state.lock().await.seen.contains(claim_id)
    }

    /// Appends an entry and flushes it to disk
    pub async fn record(&self, entry: TrackerEntry) -> Result<(), SubmitError> {
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut state = self.state.lock().await;
        state.file.write_all(line.as_bytes()).await?;
        state.file.flush().await?;
        state.seen.insert(entry.claim_id);
        state.entries.push(entry);
        Ok(())
    }

    pub async fn entries(&self) -> Vec<TrackerEntry> {
        self.state.lock().await.entries.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
