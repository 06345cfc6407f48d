//! Employment record validation
//!
//! Generated records are checked before they are written to disk so that a
//! fixture set never carries identifiers the claims system would reject.
//!
//! # Validation Rules
//!
//! ## Employers
//! - FEIN must be `NN-NNNNNNN`
//! - Account key must be 11 digits
//! - Name is required
//! - Exemption cease date must follow the commence date
//!
//! ## Employees
//! - SSN must be `NNN-NN-NNNN` with an area number other than 000, 666 or 9xx
//! - First and last name are required
//! - Wages must not be negative
//! - Every occupation must reference an employer in the pool

use crate::employee::Employee;
use crate::employer::Employer;
use crate::error::EmploymentError;
use crate::pool::EmployerPool;

/// Result of record validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the record is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal issues)
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Converts a failed result into an error
    pub fn into_result(self) -> Result<(), EmploymentError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(EmploymentError::validation_failed(self.errors))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for employers and employees
pub struct EmploymentValidator;

impl EmploymentValidator {
    pub fn validate_employer(employer: &Employer) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if !is_valid_fein(&employer.fein) {
            result.add_error(format!("Invalid FEIN: {}", employer.fein));
        }
        if employer.account_key.len() != 11 || !employer.account_key.chars().all(|c| c.is_ascii_digit()) {
            result.add_error(format!("Invalid account key: {}", employer.account_key));
        }
        if employer.name.trim().is_empty() {
            result.add_error("Employer name is required");
        }
        if let (Some(commence), Some(cease)) = (employer.exemption_commence_date, employer.exemption_cease_date) {
            if cease < commence {
                result.add_error("Exemption cease date precedes commence date");
            }
        }
        if employer.withholdings.iter().any(|w| w.amount.is_negative()) {
            result.add_error(format!("Negative withholding for employer {}", employer.fein));
        }
        if employer.withholdings.is_empty() {
            result.add_warning(format!("Employer {} has no withholdings", employer.fein));
        }

        result
    }

    pub fn validate_employee(employee: &Employee, employers: &EmployerPool) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if !is_valid_ssn(&employee.tax_identifier) {
            result.add_error(format!("Invalid SSN: {}", employee.tax_identifier));
        }
        if employee.first_name.trim().is_empty() {
            result.add_error("Employee first name is required");
        }
        if employee.last_name.trim().is_empty() {
            result.add_error("Employee last name is required");
        }
        if let Some(ref mass_id) = employee.mass_id {
            if !is_valid_mass_id(mass_id) {
                result.add_warning(format!("Unusual Massachusetts ID: {}", mass_id));
            }
        }
        if employee.occupations.is_empty() {
            result.add_warning(format!("Employee {} has no occupations", employee.id));
        }

        for occupation in &employee.occupations {
            if employers.find_by_fein(&occupation.employer_fein).is_none() {
                result.add_error(format!(
                    "Employee {} references unknown employer {}",
                    employee.id, occupation.employer_fein
                ));
            }
            if occupation.wages.iter().any(|w| w.amount.is_negative()) {
                result.add_error(format!("Negative wages for employee {}", employee.id));
            }
        }

        result
    }

    /// Validates a whole employee set against its employer pool
    pub fn validate_all<'a>(
        employees: impl IntoIterator<Item = &'a Employee>,
        employers: &EmployerPool,
    ) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for employer in employers.iter() {
            result.merge(Self::validate_employer(employer));
        }
        for employee in employees {
            result.merge(Self::validate_employee(employee, employers));
        }
        result
    }
}

/// `NNN-NN-NNNN`, area not 000, 666 or 900-999, group and serial non-zero
pub fn is_valid_ssn(ssn: &str) -> bool {
    let parts: Vec<&str> = ssn.split('-').collect();
    let [area, group, serial] = parts[..] else {
        return false;
    };
    let digits = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_digit());
    if !digits(area, 3) || !digits(group, 2) || !digits(serial, 4) {
        return false;
    }
    area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
}

/// `NN-NNNNNNN`
pub fn is_valid_fein(fein: &str) -> bool {
    match fein.split_once('-') {
        Some((prefix, suffix)) => {
            prefix.len() == 2
                && suffix.len() == 7
                && prefix.chars().chain(suffix.chars()).all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// `S` followed by 8 digits
pub fn is_valid_mass_id(mass_id: &str) -> bool {
    mass_id
        .strip_prefix('S')
        .map_or(false, |rest| rest.len() == 8 && rest.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssn_rules() {
        assert!(is_valid_ssn("123-45-6789"));
        assert!(!is_valid_ssn("000-45-6789"));
        assert!(!is_valid_ssn("666-45-6789"));
        assert!(!is_valid_ssn("912-45-6789"));
        assert!(!is_valid_ssn("123-00-6789"));
        assert!(!is_valid_ssn("123456789"));
    }

    #[test]
    fn test_fein_rules() {
        assert!(is_valid_fein("12-3456789"));
        assert!(!is_valid_fein("123456789"));
        assert!(!is_valid_fein("1-23456789"));
        assert!(!is_valid_fein("12-34567a9"));
    }

    #[test]
    fn test_mass_id_rules() {
        assert!(is_valid_mass_id("S12345678"));
        assert!(!is_valid_mass_id("12345678"));
        assert!(!is_valid_mass_id("S1234"));
    }

    #[test]
    fn test_failed_result_converts_to_error() {
        let mut result = ValidationResult::ok();
        result.add_error("bad");
        assert!(matches!(result.into_result(), Err(EmploymentError::ValidationFailed(_))));
    }
}
