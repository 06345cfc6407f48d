//! Employer records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{EmployerId, Money, Quarter};
use crate::address::Address;

/// Employer size band, which drives withholding volume and how often the
/// employer is chosen for new employees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployerSize {
    Small,
    Medium,
    Large,
}

impl EmployerSize {
    /// Relative weight used when attaching employees to employers
    pub fn weight(&self) -> u32 {
        match self {
            EmployerSize::Small => 1,
            EmployerSize::Medium => 4,
            EmployerSize::Large => 12,
        }
    }

    /// Range of quarterly withholdings, in dollars
    pub fn withholding_range(&self) -> (i64, i64) {
        match self {
            EmployerSize::Small => (1_000, 10_000),
            EmployerSize::Medium => (10_000, 100_000),
            EmployerSize::Large => (100_000, 1_000_000),
        }
    }
}

/// Withholding reported by an employer for one quarter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyWithholding {
    pub quarter: Quarter,
    pub amount: Money,
}

/// An employer registered with the Department of Revenue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    pub id: EmployerId,
    /// 11-digit DOR account key
    pub account_key: String,
    pub name: String,
    /// "Doing business as" name
    pub dba: String,
    /// Federal employer identification number, `NN-NNNNNNN`
    pub fein: String,
    pub address: Address,
    pub size: EmployerSize,
    pub family_exemption: bool,
    pub medical_exemption: bool,
    pub exemption_commence_date: Option<NaiveDate>,
    pub exemption_cease_date: Option<NaiveDate>,
    pub updated_date: DateTime<Utc>,
    pub withholdings: Vec<QuarterlyWithholding>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Employer {
    /// FEIN without the dash, as the DOR files expect it
    pub fn fein_digits(&self) -> String {
        self.fein.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Returns true if the employer is exempt from either program
    pub fn is_exempt(&self) -> bool {
        self.family_exemption || self.medical_exemption
    }

    /// Withholding reported for the given quarter, if any
    pub fn withholding_for(&self, quarter: Quarter) -> Option<Money> {
        self.withholdings
            .iter()
            .find(|w| w.quarter == quarter)
            .map(|w| w.amount)
    }
}

/// Describes the employer to generate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerSpec {
    /// Fixed size band; random when absent
    #[serde(default)]
    pub size: Option<EmployerSize>,
    #[serde(default)]
    pub family_exemption: bool,
    #[serde(default)]
    pub medical_exemption: bool,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl EmployerSpec {
    pub fn with_size(size: EmployerSize) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }
}
