//! Employee records and wage requirements

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{EmployeeId, EmployerId, Money, Quarter};

/// Minimum base-period wages, in dollars, for monetary eligibility
pub const MIN_ELIGIBLE_BASE_PERIOD_WAGES: Decimal = dec!(5700);

/// Wages earned from one employer in one quarter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyWage {
    pub quarter: Quarter,
    pub amount: Money,
}

/// An employee's job with a single employer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupation {
    pub employer_id: EmployerId,
    pub employer_fein: String,
    pub wages: Vec<QuarterlyWage>,
}

impl Occupation {
    pub fn total_wages(&self) -> Money {
        self.wages.iter().map(|w| w.amount).sum()
    }

    pub fn wages_for(&self, quarter: Quarter) -> Option<Money> {
        self.wages.iter().find(|w| w.quarter == quarter).map(|w| w.amount)
    }
}

/// A synthetic employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    /// Social security number, `NNN-NN-NNNN`
    pub tax_identifier: String,
    pub date_of_birth: NaiveDate,
    /// Massachusetts ID number, `S` followed by 8 digits
    pub mass_id: Option<String>,
    pub occupations: Vec<Occupation>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// SSN without dashes
    pub fn ssn_digits(&self) -> String {
        self.tax_identifier.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Total wages across all occupations
    pub fn annual_wages(&self) -> Money {
        self.occupations.iter().map(|o| o.total_wages()).sum()
    }

    /// Returns true if base-period wages meet the eligibility floor
    pub fn is_eligible(&self) -> bool {
        self.annual_wages().amount() >= MIN_ELIGIBLE_BASE_PERIOD_WAGES
    }

    /// The employer the employee is filing against (first occupation)
    pub fn primary_occupation(&self) -> Option<&Occupation> {
        self.occupations.first()
    }

    /// Returns true if this employee satisfies `spec`
    pub fn matches(&self, spec: &EmployeeSpec) -> bool {
        let wages_match = match &spec.wages {
            WageSpec::Eligible => self.is_eligible(),
            WageSpec::Ineligible => !self.is_eligible(),
            WageSpec::Annual(amount) => self.annual_wages() == *amount,
        };
        let mass_id_match = !spec.mass_id || self.mass_id.is_some();
        let employer_match = spec
            .employer_fein
            .as_ref()
            .map_or(true, |fein| self.occupations.iter().any(|o| &o.employer_fein == fein));

        wages_match && mass_id_match && employer_match
    }
}

/// Wage requirement for a generated or picked employee
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WageSpec {
    /// Annual wages comfortably above the eligibility floor
    #[default]
    Eligible,
    /// Annual wages below the eligibility floor
    Ineligible,
    /// Exact annual wages
    Annual(Money),
}

impl WageSpec {
    /// Annual wage band in dollars for randomly drawn wages
    pub fn dollar_range(&self) -> Option<(i64, i64)> {
        match self {
            WageSpec::Eligible => Some((30_000, 90_000)),
            WageSpec::Ineligible => Some((1_000, 5_000)),
            WageSpec::Annual(_) => None,
        }
    }
}

/// Describes the employee to generate or pick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSpec {
    #[serde(default)]
    pub wages: WageSpec,
    /// Require a Massachusetts ID
    #[serde(default)]
    pub mass_id: bool,
    /// Restrict to an employer
    #[serde(default)]
    pub employer_fein: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl EmployeeSpec {
    pub fn eligible() -> Self {
        Self::default()
    }

    pub fn ineligible() -> Self {
        Self {
            wages: WageSpec::Ineligible,
            ..Default::default()
        }
    }

    pub fn with_mass_id(mut self) -> Self {
        self.mass_id = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility_floor() {
        assert_eq!(MIN_ELIGIBLE_BASE_PERIOD_WAGES, dec!(5700));
    }

    #[test]
    fn test_wage_spec_serialization() {
        let json = serde_json::to_string(&WageSpec::Ineligible).unwrap();
        assert_eq!(json, "\"ineligible\"");
    }
}
