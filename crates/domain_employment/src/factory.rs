//! Seeded factories for employers and employees
//!
//! Names and street addresses come from `fake`; identifiers, wages and dates
//! are drawn directly from the caller's RNG. Nothing here touches a global
//! RNG, so two runs with the same seed produce identical records.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

use core_kernel::{EmployeeId, EmployerId, Money, Quarter};

use crate::address::Address;
use crate::employee::{Employee, EmployeeSpec, Occupation, QuarterlyWage, WageSpec};
use crate::employer::{Employer, EmployerSize, EmployerSpec, QuarterlyWithholding};
use crate::error::EmploymentError;
use crate::pool::EmployerPool;

/// Number of quarters of wage history attached to every record
pub const WAGE_HISTORY_QUARTERS: usize = 4;

/// Builds synthetic employers
pub struct EmployerFactory;

impl EmployerFactory {
    /// Generates one employer matching `spec`, with withholdings for the
    /// four complete quarters before `as_of`
    pub fn generate<R: Rng>(spec: &EmployerSpec, as_of: NaiveDate, rng: &mut R) -> Employer {
        let size = spec.size.unwrap_or_else(|| random_size(rng));
        let name: String = CompanyName().fake_with_rng(rng);
        let dba: String = if rng.gen_bool(0.3) {
            CompanyName().fake_with_rng(rng)
        } else {
            name.clone()
        };

        let (low, high) = size.withholding_range();
        let withholdings = Quarter::last_n(as_of, WAGE_HISTORY_QUARTERS)
            .into_iter()
            .map(|quarter| QuarterlyWithholding {
                quarter,
                amount: Money::from_cents(rng.gen_range(low * 100..=high * 100)),
            })
            .collect();

        let (exemption_commence_date, exemption_cease_date) =
            if spec.family_exemption || spec.medical_exemption {
                let commence = as_of - Duration::days(rng.gen_range(30..=365));
                (Some(commence), Some(commence + Duration::days(365)))
            } else {
                (None, None)
            };

        let updated_date = Utc.from_utc_datetime(
            &(as_of - Duration::days(rng.gen_range(1..=90)))
                .and_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), 0)
                .unwrap_or_default(),
        );

        let employer = Employer {
            id: EmployerId::from_random_bits(rng.gen()),
            account_key: format!("{:011}", rng.gen_range(0..100_000_000_000u64)),
            name,
            dba,
            fein: format!("{:02}-{:07}", rng.gen_range(10..100), rng.gen_range(0..10_000_000)),
            address: Address::generate(rng),
            size,
            family_exemption: spec.family_exemption,
            medical_exemption: spec.medical_exemption,
            exemption_commence_date,
            exemption_cease_date,
            updated_date,
            withholdings,
            metadata: spec.metadata.clone(),
        };

        debug!(employer_id = %employer.id, fein = %employer.fein, size = ?size, "Generated employer");
        employer
    }
}

/// Builds synthetic employees attached to employers from a pool
pub struct EmployeeFactory;

impl EmployeeFactory {
    /// Generates one employee matching `spec`
    ///
    /// The employer is the one named by `spec.employer_fein`, or otherwise a
    /// size-weighted pick from `employers`.
    pub fn generate<R: Rng>(
        spec: &EmployeeSpec,
        employers: &EmployerPool,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> Result<Employee, EmploymentError> {
        let employer = match &spec.employer_fein {
            Some(fein) => employers
                .find_by_fein(fein)
                .ok_or_else(|| EmploymentError::EmployerNotFound(fein.clone()))?,
            None => employers.pick(rng).ok_or(EmploymentError::NoEmployers)?,
        };

        let annual = match (&spec.wages, spec.wages.dollar_range()) {
            (WageSpec::Annual(amount), _) => *amount,
            (_, Some((low, high))) => Money::from_cents(rng.gen_range(low * 100..=high * 100)),
            (_, None) => Money::zero(),
        };

        let quarters = Quarter::last_n(as_of, WAGE_HISTORY_QUARTERS);
        let wages = annual
            .allocate(quarters.len() as u32)?
            .into_iter()
            .zip(quarters)
            .map(|(amount, quarter)| QuarterlyWage { quarter, amount })
            .collect();

        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let age_days = rng.gen_range(18 * 365..=65 * 365);

        let mass_id = if spec.mass_id || rng.gen_bool(0.5) {
            Some(format!("S{:08}", rng.gen_range(0..100_000_000)))
        } else {
            None
        };

        let employee = Employee {
            id: EmployeeId::from_random_bits(rng.gen()),
            first_name,
            last_name,
            tax_identifier: random_ssn(rng),
            date_of_birth: as_of - Duration::days(age_days),
            mass_id,
            occupations: vec![Occupation {
                employer_id: employer.id,
                employer_fein: employer.fein.clone(),
                wages,
            }],
            metadata: merge_metadata(&spec.metadata),
        };

        debug!(employee_id = %employee.id, employer_fein = %employer.fein, "Generated employee");
        Ok(employee)
    }
}

fn random_size<R: Rng>(rng: &mut R) -> EmployerSize {
    match rng.gen_range(0..10) {
        0..=5 => EmployerSize::Small,
        6..=8 => EmployerSize::Medium,
        _ => EmployerSize::Large,
    }
}

/// SSN with an area number that is never 000, 666 or 9xx
fn random_ssn<R: Rng>(rng: &mut R) -> String {
    let mut area = rng.gen_range(1..900);
    if area == 666 {
        area = 667;
    }
    format!(
        "{:03}-{:02}-{:04}",
        area,
        rng.gen_range(1..100),
        rng.gen_range(1..10_000)
    )
}

fn merge_metadata(spec_metadata: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("generator".to_string(), "employee_factory".to_string());
    metadata.extend(spec_metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_ssn_area_is_never_forbidden() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..2_000 {
            let ssn = random_ssn(&mut rng);
            let area = &ssn[..3];
            assert_ne!(area, "000");
            assert_ne!(area, "666");
            assert!(!area.starts_with('9'));
        }
    }

    #[test]
    fn test_employer_has_four_quarters_of_withholding() {
        let mut rng = StdRng::seed_from_u64(7);
        let employer = EmployerFactory::generate(&EmployerSpec::default(), as_of(), &mut rng);

        assert_eq!(employer.withholdings.len(), WAGE_HISTORY_QUARTERS);
        assert_eq!(employer.account_key.len(), 11);
        assert_eq!(employer.fein.len(), 10);
        assert_eq!(employer.address.state, "MA");
    }

    #[test]
    fn test_exempt_employer_has_exemption_dates() {
        let mut rng = StdRng::seed_from_u64(7);
        let spec = EmployerSpec {
            family_exemption: true,
            ..Default::default()
        };
        let employer = EmployerFactory::generate(&spec, as_of(), &mut rng);

        assert!(employer.is_exempt());
        assert!(employer.exemption_commence_date.is_some());
        assert!(employer.exemption_cease_date.is_some());
    }
}
