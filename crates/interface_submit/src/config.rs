//! Submission configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SubmitError;

const TRACKING_FILE: &str = "claim_state.jsonl";

/// Settings for talking to the claims API and pacing a submission run
///
/// Loaded from `CLAIMGEN_`-prefixed environment variables; anything unset
/// keeps its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Base URL of the claims API, including the version segment
    pub api_base_url: String,
    /// Bearer token sent with every request
    pub api_token: String,
    /// Claims submitted at once
    pub concurrency: usize,
    /// Consecutive failures that trigger a cooldown or halt; unset never halts
    pub max_consecutive_errors: Option<u32>,
    pub cooldown_secs: u64,
    pub max_cooldowns: u32,
    pub request_timeout_secs: u64,
    /// Simulation directory read by `submit` and written by `generate`
    pub data_dir: PathBuf,
    /// Directory of PDF templates; blank forms are synthesised when unset
    pub templates_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:1550/v1".to_string(),
            api_token: String::new(),
            concurrency: 3,
            max_consecutive_errors: None,
            cooldown_secs: 60,
            max_cooldowns: 1,
            request_timeout_secs: 30,
            data_dir: PathBuf::from("./data"),
            templates_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl SubmitConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, SubmitError> {
        let config: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix("CLAIMGEN").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.concurrency == 0 {
            return Err(SubmitError::invalid_config("concurrency must be at least 1"));
        }
        if self.max_consecutive_errors == Some(0) {
            return Err(SubmitError::invalid_config("max_consecutive_errors must be at least 1"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(SubmitError::invalid_config("api_base_url is empty"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// JSON-lines file recording every submission attempt
    pub fn tracking_file(&self) -> PathBuf {
        self.data_dir.join(TRACKING_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SubmitConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:1550/v1");
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.max_consecutive_errors, None);
        assert_eq!(config.cooldown(), Duration::from_secs(60));
        assert_eq!(config.max_cooldowns, 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.tracking_file(), PathBuf::from("./data").join("claim_state.jsonl"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = SubmitConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SubmitError::InvalidConfig(_))));
    }
}
