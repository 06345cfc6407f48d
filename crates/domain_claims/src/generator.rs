//! Seeded claim generator
//!
//! Every random choice is drawn from a single `StdRng` seeded from
//! `GeneratorConfig::seed`, so the same seed, scenario sequence and
//! employee source always yield the same claims.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use core_kernel::ClaimId;
use domain_employment::{
    Address, Employee, EmployeeFactory, EmployeePool, EmployerPool, EmploymentError,
};

use crate::claim::{Claim, LeaveDetails, LeavePeriod, LeavePeriodKind, LeaveReason, ReasonQualifier, WorkPattern};
use crate::error::ClaimError;
use crate::generated::{
    AccountType, DocumentRequest, EmployerResponse, GeneratedClaim, PaymentPreference,
};
use crate::scenario::{BondingDate, ClaimSpec, PaymentSpec, ScenarioCatalog, ScenarioMix, ScenarioSpec};

/// Generator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Date that leave and notification dates are drawn relative to
    pub as_of: NaiveDate,
}

/// Where applicants come from
pub enum EmployeeSource<'a> {
    /// Pick unused employees from a pool, optionally generating new ones
    /// once the pool runs dry
    Pool {
        employees: &'a mut EmployeePool,
        employers: &'a EmployerPool,
        allow_new_employees: bool,
    },
    /// Generate a fresh employee for every claim
    Employers(&'a EmployerPool),
}

/// Produces `GeneratedClaim`s from scenarios
pub struct ClaimGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl ClaimGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates one claim for the scenario
    pub fn generate(
        &mut self,
        scenario: &ScenarioSpec,
        source: &mut EmployeeSource<'_>,
    ) -> Result<GeneratedClaim, ClaimError> {
        let spec = &scenario.claim;
        let kind = spec.leave_period_kind()?;
        spec.check_reason()?;
        if spec.reason == LeaveReason::ChildBonding && spec.bonding_date.is_none() {
            return Err(ClaimError::missing("bonding_date"));
        }

        let employee = self.employee_for(scenario, source)?;
        let employer_fein = employee
            .primary_occupation()
            .map(|o| o.employer_fein.clone())
            .ok_or_else(|| ClaimError::missing("employer_fein"))?;

        let work_pattern = spec.work_pattern.build();
        let (start, end) = self.leave_dates(spec);
        let leave_period = self.leave_period(kind, spec, &work_pattern, start, end);

        let bonding = spec.bonding_date.map(|b| self.bonding_date(b, start));
        let (child_birth_date, child_placement_date) = match spec.reason_qualifier {
            Some(ReasonQualifier::Newborn) => (bonding, None),
            Some(ReasonQualifier::Adoption) | Some(ReasonQualifier::FosterCare) => (None, bonding),
            None => (None, None),
        };

        let notification_date = self.config.as_of - Duration::days(self.rng.gen_range(1..=30));

        let claim = Claim {
            employee_id: employee.id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            tax_identifier: employee.tax_identifier.clone(),
            date_of_birth: employee.date_of_birth,
            has_state_id: employee.mass_id.is_some(),
            mass_id: employee.mass_id.clone(),
            employer_fein,
            residential_address: Address::generate(&mut self.rng),
            phone: format!("+1617{:07}", self.rng.gen_range(2_000_000..10_000_000)),
            email: format!(
                "{}.{}{}@example.com",
                employee.first_name.to_lowercase(),
                employee.last_name.to_lowercase(),
                self.rng.gen_range(100..1000)
            )
            .replace(' ', ""),
            hours_worked_per_week: work_pattern.hours_per_week(),
            work_pattern,
            leave_details: LeaveDetails {
                reason: spec.reason,
                reason_qualifier: spec.reason_qualifier,
                pregnant_or_recent_birth: spec.pregnant_or_recent_birth
                    || spec.reason == LeaveReason::PregnancyMaternity,
                child_birth_date,
                child_placement_date,
                employer_notified: true,
                employer_notification_date: Some(notification_date),
                leave_period,
            },
        };

        let employer_response = spec.employer_response.as_ref().map(|r| EmployerResponse {
            hours_worked_per_week: claim.hours_worked_per_week,
            decision: r.decision,
            fraud: r.fraud,
            believe_relationship_accurate: (spec.reason == LeaveReason::CareForFamilyMember).then_some(true),
            comment: r.comment.clone(),
        });

        let documents = spec
            .docs
            .iter()
            .map(|(document_type, config)| DocumentRequest {
                document_type: *document_type,
                config: *config,
                path: None,
            })
            .collect();

        let payment_preference = self.payment_preference(spec.payment);

        let mut metadata: BTreeMap<String, String> = spec.metadata.clone();
        metadata.insert("seed".to_string(), self.config.seed.to_string());

        let generated = GeneratedClaim {
            id: ClaimId::from_random_bits(self.rng.gen()),
            scenario: scenario.name.clone(),
            claim,
            documents,
            payment_preference,
            employer_response,
            metadata,
        };

        debug!(
            claim_id = %generated.id,
            scenario = %generated.scenario,
            leave_type = kind.as_str(),
            "Generated claim"
        );
        Ok(generated)
    }

    /// Generates `total` claims split across the mix
    pub fn generate_many(
        &mut self,
        catalog: &ScenarioCatalog,
        mix: &ScenarioMix,
        total: usize,
        source: &mut EmployeeSource<'_>,
    ) -> Result<Vec<GeneratedClaim>, ClaimError> {
        mix.validate(catalog)?;
        let mut claims = Vec::with_capacity(total);
        for (name, count) in mix.counts(total) {
            let scenario = catalog.get(&name)?;
            for _ in 0..count {
                claims.push(self.generate(scenario, source)?);
            }
        }
        info!(count = claims.len(), "Generated claims");
        Ok(claims)
    }

    fn employee_for(
        &mut self,
        scenario: &ScenarioSpec,
        source: &mut EmployeeSource<'_>,
    ) -> Result<Employee, ClaimError> {
        match source {
            EmployeeSource::Pool {
                employees,
                employers,
                allow_new_employees,
            } => match employees.pick(&scenario.employee, &mut self.rng) {
                Ok(employee) => Ok(employee),
                Err(EmploymentError::EmployeePoolExhausted { pool_size, used }) => {
                    if !*allow_new_employees {
                        warn!(scenario = %scenario.name, pool_size, used, "Employee pool exhausted");
                        return Err(ClaimError::EmployeePoolExhausted {
                            scenario: scenario.name.clone(),
                            pool_size,
                            used,
                        });
                    }
                    let employee = self.new_employee(scenario, employers)?;
                    employees.add_used(employee.clone());
                    Ok(employee)
                }
                Err(e) => Err(e.into()),
            },
            EmployeeSource::Employers(employers) => self.new_employee(scenario, employers),
        }
    }

    fn new_employee(&mut self, scenario: &ScenarioSpec, employers: &EmployerPool) -> Result<Employee, ClaimError> {
        EmployeeFactory::generate(&scenario.employee, employers, self.config.as_of, &mut self.rng).map_err(|e| match e {
            EmploymentError::NoEmployers => ClaimError::MissingEmployer,
            other => other.into(),
        })
    }

    fn leave_dates(&mut self, spec: &ClaimSpec) -> (NaiveDate, NaiveDate) {
        if let Some((start, end)) = spec.leave_dates {
            return (start, end);
        }
        let start = self.config.as_of + Duration::days(self.rng.gen_range(14..=60));
        let length = if spec.short_claim {
            self.rng.gen_range(1..=7)
        } else {
            self.rng.gen_range(14..=84)
        };
        (start, start + Duration::days(length - 1))
    }

    fn leave_period(
        &mut self,
        kind: LeavePeriodKind,
        spec: &ClaimSpec,
        work_pattern: &WorkPattern,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> LeavePeriod {
        match kind {
            LeavePeriodKind::Continuous => LeavePeriod::Continuous { start_date, end_date },
            LeavePeriodKind::Intermittent => {
                let schedule = spec.intermittent.unwrap_or_default();
                LeavePeriod::Intermittent {
                    start_date,
                    end_date,
                    frequency: schedule.frequency,
                    frequency_interval: schedule.frequency_interval,
                    frequency_interval_basis: schedule.frequency_interval_basis,
                    duration: schedule.duration,
                    duration_basis: schedule.duration_basis,
                }
            }
            LeavePeriodKind::ReducedSchedule => LeavePeriod::ReducedSchedule {
                start_date,
                end_date,
                minutes_off: work_pattern.minutes.map(|m| m / 2 / 15 * 15),
            },
        }
    }

    fn bonding_date(&mut self, bonding: BondingDate, leave_start: NaiveDate) -> NaiveDate {
        match bonding {
            BondingDate::FarPast => leave_start - Duration::days(self.rng.gen_range(366..=730)),
            BondingDate::Past => leave_start - Duration::days(self.rng.gen_range(1..=30)),
            BondingDate::Future => self.config.as_of + Duration::days(self.rng.gen_range(1..=30)),
        }
    }

    fn payment_preference(&mut self, payment: PaymentSpec) -> PaymentPreference {
        match payment {
            PaymentSpec::Ach => PaymentPreference::Ach {
                routing_number: routing_number(&mut self.rng),
                account_number: format!("{:010}", self.rng.gen_range(0..10_000_000_000u64)),
                account_type: if self.rng.gen_bool(0.5) {
                    AccountType::Checking
                } else {
                    AccountType::Savings
                },
            },
            PaymentSpec::Check => PaymentPreference::Check,
            PaymentSpec::Debit => PaymentPreference::Debit,
        }
    }
}

/// Nine-digit ABA routing number with a valid check digit
fn routing_number<R: Rng>(rng: &mut R) -> String {
    let mut digits: Vec<u32> = (0..8).map(|_| rng.gen_range(0..10)).collect();
    let weights = [3, 7, 1, 3, 7, 1, 3, 7];
    let sum: u32 = digits.iter().zip(weights.iter()).map(|(d, w)| d * w).sum();
    digits.push((10 - sum % 10) % 10);
    digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_number_checksum() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let number = routing_number(&mut rng);
            let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
            assert_eq!(digits.len(), 9);
            let sum = 3 * (digits[0] + digits[3] + digits[6])
                + 7 * (digits[1] + digits[4] + digits[7])
                + (digits[2] + digits[5] + digits[8]);
            assert_eq!(sum % 10, 0);
        }
    }
}
