//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use core_kernel::{ClaimId, EmployeeId, EmployerId, Money, Quarter};
use domain_claims::{
    Claim, DocumentConfig, DocumentRequest, DocumentType, GeneratedClaim, LeaveDetails, LeavePeriod, LeaveReason,
    PaymentPreference, ReasonQualifier, WorkPattern,
};
use domain_employment::{
    Address, Employee, Employer, EmployerSize, Occupation, QuarterlyWage, QuarterlyWithholding,
    WAGE_HISTORY_QUARTERS,
};

use crate::fixtures::{AddressFixtures, DateFixtures, MoneyFixtures};

/// Builder for constructing test employers
pub struct EmployerBuilder {
    employer: Employer,
}

impl Default for EmployerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployerBuilder {
    /// Creates a medium, non-exempt employer with four quarters of withholdings
    pub fn new() -> Self {
        let withholdings = Quarter::last_n(DateFixtures::as_of(), WAGE_HISTORY_QUARTERS)
            .into_iter()
            .map(|quarter| QuarterlyWithholding {
                quarter,
                amount: Money::new(dec!(1500.00)),
            })
            .collect();

        Self {
            employer: Employer {
                id: EmployerId::new(),
                account_key: "00012345678".to_string(),
                name: "Acme Widgets LLC".to_string(),
                dba: "Acme Widgets".to_string(),
                fein: "12-3456789".to_string(),
                address: AddressFixtures::boston(),
                size: EmployerSize::Medium,
                family_exemption: false,
                medical_exemption: false,
                exemption_commence_date: None,
                exemption_cease_date: None,
                updated_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                withholdings,
                metadata: BTreeMap::new(),
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.employer.name = name.into();
        self
    }

    pub fn with_fein(mut self, fein: impl Into<String>) -> Self {
        self.employer.fein = fein.into();
        self
    }

    pub fn with_account_key(mut self, account_key: impl Into<String>) -> Self {
        self.employer.account_key = account_key.into();
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.employer.address = address;
        self
    }

    pub fn with_size(mut self, size: EmployerSize) -> Self {
        self.employer.size = size;
        self
    }

    /// Marks the employer exempt from both programs for the given window
    pub fn exempt(mut self, commence: NaiveDate, cease: NaiveDate) -> Self {
        self.employer.family_exemption = true;
        self.employer.medical_exemption = true;
        self.employer.exemption_commence_date = Some(commence);
        self.employer.exemption_cease_date = Some(cease);
        self
    }

    pub fn with_withholdings(mut self, withholdings: Vec<QuarterlyWithholding>) -> Self {
        self.employer.withholdings = withholdings;
        self
    }

    pub fn build(self) -> Employer {
        self.employer
    }
}

/// Builder for constructing test employees
pub struct EmployeeBuilder {
    employee: Employee,
}

impl Default for EmployeeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeBuilder {
    /// Creates an employee with no occupations
    pub fn new() -> Self {
        Self {
            employee: Employee {
                id: EmployeeId::new(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                tax_identifier: "123-45-6789".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 12).unwrap(),
                mass_id: None,
                occupations: Vec::new(),
                metadata: BTreeMap::new(),
            },
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.employee.first_name = first.into();
        self.employee.last_name = last.into();
        self
    }

    pub fn with_ssn(mut self, ssn: impl Into<String>) -> Self {
        self.employee.tax_identifier = ssn.into();
        self
    }

    pub fn with_mass_id(mut self, mass_id: impl Into<String>) -> Self {
        self.employee.mass_id = Some(mass_id.into());
        self
    }

    /// Adds an occupation with the same wage in each of the last four quarters
    pub fn working_for(mut self, employer: &Employer, quarterly_wage: Money) -> Self {
        let wages = Quarter::last_n(DateFixtures::as_of(), WAGE_HISTORY_QUARTERS)
            .into_iter()
            .map(|quarter| QuarterlyWage {
                quarter,
                amount: quarterly_wage,
            })
            .collect();
        self.employee.occupations.push(Occupation {
            employer_id: employer.id,
            employer_fein: employer.fein.clone(),
            wages,
        });
        self
    }

    /// Adds an occupation paying the standard quarterly wage fixture
    pub fn eligible_at(self, employer: &Employer) -> Self {
        self.working_for(employer, MoneyFixtures::quarterly_wage())
    }

    pub fn build(self) -> Employee {
        self.employee
    }
}

/// Builder for constructing test generated claims
pub struct GeneratedClaimBuilder {
    id: ClaimId,
    scenario: String,
    employee: Employee,
    employer_fein: String,
    reason: LeaveReason,
    reason_qualifier: Option<ReasonQualifier>,
    leave_period: LeavePeriod,
    work_pattern: WorkPattern,
    hours_worked_per_week: Decimal,
    documents: Vec<DocumentType>,
    payment_preference: PaymentPreference,
}

impl Default for GeneratedClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratedClaimBuilder {
    /// Creates a two-week continuous medical leave claim with an HCP form
    pub fn new() -> Self {
        let start = DateFixtures::as_of() + chrono::Duration::days(14);
        Self {
            id: ClaimId::new(),
            scenario: "medical_continuous".to_string(),
            employee: EmployeeBuilder::new().build(),
            employer_fein: "12-3456789".to_string(),
            reason: LeaveReason::SeriousHealthCondition,
            reason_qualifier: None,
            leave_period: LeavePeriod::Continuous {
                start_date: start,
                end_date: start + chrono::Duration::days(13),
            },
            work_pattern: WorkPattern::standard(),
            hours_worked_per_week: dec!(40),
            documents: vec![DocumentType::Hcp],
            payment_preference: PaymentPreference::Check,
        }
    }

    pub fn with_id(mut self, id: ClaimId) -> Self {
        self.id = id;
        self
    }

    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = scenario.into();
        self
    }

    /// Files the claim for `employee`, against their first employer when present
    pub fn for_employee(mut self, employee: Employee) -> Self {
        if let Some(occupation) = employee.primary_occupation() {
            self.employer_fein = occupation.employer_fein.clone();
        }
        self.employee = employee;
        self
    }

    pub fn with_reason(mut self, reason: LeaveReason, qualifier: Option<ReasonQualifier>) -> Self {
        self.reason = reason;
        self.reason_qualifier = qualifier;
        self
    }

    pub fn with_leave_period(mut self, leave_period: LeavePeriod) -> Self {
        self.leave_period = leave_period;
        self
    }

    pub fn with_work_pattern(mut self, work_pattern: WorkPattern, hours_worked_per_week: Decimal) -> Self {
        self.work_pattern = work_pattern;
        self.hours_worked_per_week = hours_worked_per_week;
        self
    }

    pub fn with_documents(mut self, documents: Vec<DocumentType>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_payment_preference(mut self, payment_preference: PaymentPreference) -> Self {
        self.payment_preference = payment_preference;
        self
    }

    pub fn build(self) -> GeneratedClaim {
        let employee = self.employee;
        let notified = self.leave_period.dates().start - chrono::Duration::days(30);
        GeneratedClaim {
            id: self.id,
            scenario: self.scenario,
            claim: Claim {
                employee_id: employee.id,
                first_name: employee.first_name,
                last_name: employee.last_name,
                tax_identifier: employee.tax_identifier,
                date_of_birth: employee.date_of_birth,
                has_state_id: employee.mass_id.is_some(),
                mass_id: employee.mass_id,
                employer_fein: self.employer_fein,
                residential_address: AddressFixtures::worcester(),
                phone: "+15085550100".to_string(),
                email: "jane.doe@example.com".to_string(),
                hours_worked_per_week: self.hours_worked_per_week,
                work_pattern: self.work_pattern,
                leave_details: LeaveDetails {
                    reason: self.reason,
                    reason_qualifier: self.reason_qualifier,
                    pregnant_or_recent_birth: false,
                    child_birth_date: None,
                    child_placement_date: None,
                    employer_notified: true,
                    employer_notification_date: Some(notified),
                    leave_period: self.leave_period,
                },
            },
            documents: self
                .documents
                .into_iter()
                .map(|document_type| DocumentRequest {
                    document_type,
                    config: DocumentConfig::default(),
                    path: None,
                })
                .collect(),
            payment_preference: self.payment_preference,
            employer_response: None,
            metadata: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_employee_builder() {
        let employer = EmployerBuilder::new().build();
        let employee = EmployeeBuilder::new().eligible_at(&employer).build();

        assert_eq!(employee.occupations.len(), 1);
        assert_eq!(employee.occupations[0].wages.len(), WAGE_HISTORY_QUARTERS);
        assert!(employee.is_eligible());
    }

    #[test]
    fn test_claim_builder_uses_employee_employer() {
        let employer = EmployerBuilder::new().with_fein("98-7654321").build();
        let employee = EmployeeBuilder::new().eligible_at(&employer).build();
        let claim = GeneratedClaimBuilder::new().for_employee(employee.clone()).build();

        assert_eq!(claim.claim.employer_fein, "98-7654321");
        assert_eq!(claim.claim.employee_id, employee.id);
        assert_eq!(claim.documents.len(), 1);
        assert!(claim.claim.leave_details.has_continuous_leave_periods());
    }
}
